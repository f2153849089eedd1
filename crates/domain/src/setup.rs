use chronopay_core::AppResult;

use crate::record::{FieldFormat, FieldSpec, FieldValues, parse_decimal, parse_integer};

/// Default maximum length for record codes.
pub const CODE_MAX_LENGTH: usize = 10;

/// Default maximum length for descriptions.
pub const DESCRIPTION_MAX_LENGTH: usize = 50;

/// Setup pages backed by a list resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SetupKind {
    /// Department maintenance.
    Department,
    /// Pay house maintenance.
    PayHouse,
    /// Employee classification maintenance.
    Classification,
    /// Group schedule maintenance.
    GroupSchedule,
    /// Timekeeping device (SDK) configuration.
    SdkEntry,
    /// Holiday overtime rate table.
    HolidayOtRate,
}

const DEPARTMENT_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("code", "Department Code", &["deptCode", "DeptCode", "code", "Code"], "DeptCode")
        .required()
        .max_length(CODE_MAX_LENGTH)
        .searchable(),
    FieldSpec::text(
        "description",
        "Description",
        &["deptDesc", "DeptDesc", "description", "Description"],
        "DeptDesc",
    )
    .required()
    .max_length(DESCRIPTION_MAX_LENGTH)
    .searchable(),
    FieldSpec::text("divisionCode", "Division", &["divCode", "DivCode", "divisionCode"], "DivCode")
        .max_length(CODE_MAX_LENGTH)
        .searchable(),
    FieldSpec::text(
        "headEmpCode",
        "Department Head",
        &["deptHead", "DeptHead", "empCode", "EmpCode"],
        "DeptHead",
    )
    .max_length(20),
    FieldSpec::text("email", "Email", &["email", "Email", "emailAddress"], "Email")
        .max_length(100)
        .format(FieldFormat::Email),
];

const PAY_HOUSE_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("code", "Pay House Code", &["payHouseCode", "PayHouseCode", "code", "Code"], "PayHouseCode")
        .required()
        .max_length(CODE_MAX_LENGTH)
        .searchable(),
    FieldSpec::text(
        "description",
        "Description",
        &["payHouseDesc", "PayHouseDesc", "description", "Description"],
        "PayHouseDesc",
    )
    .required()
    .max_length(DESCRIPTION_MAX_LENGTH)
    .searchable(),
];

const CLASSIFICATION_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("code", "Classification Code", &["classCode", "ClassCode", "code", "Code"], "ClassCode")
        .required()
        .max_length(CODE_MAX_LENGTH)
        .searchable(),
    FieldSpec::text(
        "description",
        "Description",
        &["classDesc", "ClassDesc", "description", "Description"],
        "ClassDesc",
    )
    .required()
    .max_length(DESCRIPTION_MAX_LENGTH)
    .searchable(),
];

const GROUP_SCHEDULE_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("id", "Id", &["id", "Id", "ID", "groupSchedId"], "Id").format(FieldFormat::Integer),
    FieldSpec::text("code", "Group Code", &["groupCode", "GroupCode", "code", "Code"], "GroupCode")
        .required()
        .max_length(CODE_MAX_LENGTH)
        .searchable(),
    FieldSpec::text(
        "description",
        "Description",
        &["groupDesc", "GroupDesc", "description", "Description"],
        "GroupDesc",
    )
    .required()
    .max_length(DESCRIPTION_MAX_LENGTH)
    .searchable(),
    FieldSpec::text("empCode", "Employee", &["empCode", "EmpCode", "employeeCode"], "EmpCode")
        .max_length(20)
        .searchable(),
    FieldSpec::text("deviceName", "Device", &["deviceName", "DeviceName", "device"], "DeviceName")
        .max_length(30)
        .searchable(),
];

const SDK_ENTRY_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("id", "Id", &["id", "Id", "ID", "sdkId"], "Id").format(FieldFormat::Integer),
    FieldSpec::text("code", "Device Name", &["deviceName", "DeviceName", "code", "Code"], "DeviceName")
        .required()
        .max_length(30)
        .searchable(),
    FieldSpec::text("ipAddress", "IP Address", &["ipAddress", "IpAddress", "IPAddress", "ip"], "IpAddress")
        .required()
        .max_length(45)
        .searchable(),
    FieldSpec::text("port", "Port", &["port", "Port"], "Port")
        .required()
        .format(FieldFormat::Integer),
    FieldSpec::text(
        "serialNumber",
        "Serial Number",
        &["serialNumber", "SerialNumber", "serialNo", "SerialNo"],
        "SerialNumber",
    )
    .max_length(50)
    .searchable(),
];

const HOLIDAY_OT_RATE_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("code", "OT Code", &["otCode", "OtCode", "OTCode", "code", "Code"], "OTCode")
        .required()
        .max_length(CODE_MAX_LENGTH)
        .searchable(),
    FieldSpec::text(
        "description",
        "Description",
        &["description", "Description", "otDesc", "OTDesc"],
        "Description",
    )
    .required()
    .max_length(DESCRIPTION_MAX_LENGTH)
    .searchable(),
    FieldSpec::text("rate", "Rate", &["rate", "Rate", "otRate", "OTRate"], "Rate")
        .required()
        .format(FieldFormat::Decimal),
    FieldSpec::text("dtrFlag", "DTR Flag", &["dtrFlag", "DtrFlag", "DTRFlag", "flagCode"], "DTRFlag")
        .max_length(CODE_MAX_LENGTH)
        .searchable(),
];

impl SetupKind {
    /// Returns the backend list resource path.
    #[must_use]
    pub fn resource_path(&self) -> &'static str {
        match self {
            Self::Department => "/Fs/Employment/Department",
            Self::PayHouse => "/Fs/Employment/PayHouse",
            Self::Classification => "/Fs/Employment/Classification",
            Self::GroupSchedule => "/Fs/Process/GroupSchedule",
            Self::SdkEntry => "/Fs/Process/Sdk",
            Self::HolidayOtRate => "/Fs/Process/HolidayOtRate",
        }
    }

    /// Returns the form name used in permission entries.
    #[must_use]
    pub fn form_name(&self) -> &'static str {
        match self {
            Self::Department => "Department",
            Self::PayHouse => "Pay House",
            Self::Classification => "Classification",
            Self::GroupSchedule => "Group Schedule",
            Self::SdkEntry => "SDK",
            Self::HolidayOtRate => "Holiday OT Rates",
        }
    }

    /// Returns the field declarations for the record kind.
    #[must_use]
    pub fn fields(&self) -> &'static [FieldSpec] {
        match self {
            Self::Department => DEPARTMENT_FIELDS,
            Self::PayHouse => PAY_HOUSE_FIELDS,
            Self::Classification => CLASSIFICATION_FIELDS,
            Self::GroupSchedule => GROUP_SCHEDULE_FIELDS,
            Self::SdkEntry => SDK_ENTRY_FIELDS,
            Self::HolidayOtRate => HOLIDAY_OT_RATE_FIELDS,
        }
    }

    /// Returns the table page size.
    #[must_use]
    pub fn page_size(&self) -> usize {
        match self {
            Self::GroupSchedule => 20,
            Self::HolidayOtRate => 100,
            Self::Department
            | Self::PayHouse
            | Self::Classification
            | Self::SdkEntry => 10,
        }
    }

    /// Returns the declaration of a named field.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields().iter().find(|field| field.name == name)
    }
}

/// Typed view over one setup list row.
pub trait SetupRecord: Clone + std::fmt::Debug + Send + Sync + 'static {
    /// Record kind backing this type.
    const KIND: SetupKind;

    /// Builds the typed record from normalized values.
    fn from_fields(values: &FieldValues) -> AppResult<Self>;

    /// Returns the record as editor values.
    fn to_fields(&self) -> FieldValues;

    /// Returns the user-facing unique code.
    fn code(&self) -> &str;

    /// Returns the identifier used in update and delete paths.
    fn record_key(&self) -> String {
        self.code().to_owned()
    }
}

/// Department setup row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Department {
    /// Department code.
    pub code: String,
    /// Department description.
    pub description: String,
    /// Owning division code.
    pub division_code: String,
    /// Employee code of the department head.
    pub head_emp_code: String,
    /// Department contact email.
    pub email: String,
}

impl SetupRecord for Department {
    const KIND: SetupKind = SetupKind::Department;

    fn from_fields(values: &FieldValues) -> AppResult<Self> {
        Ok(Self {
            code: values.get("code").to_owned(),
            description: values.get("description").to_owned(),
            division_code: values.get("divisionCode").to_owned(),
            head_emp_code: values.get("headEmpCode").to_owned(),
            email: values.get("email").to_owned(),
        })
    }

    fn to_fields(&self) -> FieldValues {
        FieldValues::new()
            .with("code", self.code.as_str())
            .with("description", self.description.as_str())
            .with("divisionCode", self.division_code.as_str())
            .with("headEmpCode", self.head_emp_code.as_str())
            .with("email", self.email.as_str())
    }

    fn code(&self) -> &str {
        self.code.as_str()
    }
}

/// Pay house setup row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayHouse {
    /// Pay house code.
    pub code: String,
    /// Pay house description.
    pub description: String,
}

impl SetupRecord for PayHouse {
    const KIND: SetupKind = SetupKind::PayHouse;

    fn from_fields(values: &FieldValues) -> AppResult<Self> {
        Ok(Self {
            code: values.get("code").to_owned(),
            description: values.get("description").to_owned(),
        })
    }

    fn to_fields(&self) -> FieldValues {
        FieldValues::new()
            .with("code", self.code.as_str())
            .with("description", self.description.as_str())
    }

    fn code(&self) -> &str {
        self.code.as_str()
    }
}

/// Classification setup row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Classification code.
    pub code: String,
    /// Classification description.
    pub description: String,
}

impl SetupRecord for Classification {
    const KIND: SetupKind = SetupKind::Classification;

    fn from_fields(values: &FieldValues) -> AppResult<Self> {
        Ok(Self {
            code: values.get("code").to_owned(),
            description: values.get("description").to_owned(),
        })
    }

    fn to_fields(&self) -> FieldValues {
        FieldValues::new()
            .with("code", self.code.as_str())
            .with("description", self.description.as_str())
    }

    fn code(&self) -> &str {
        self.code.as_str()
    }
}

/// Group schedule setup row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSchedule {
    /// Server-assigned identifier; zero before the first save.
    pub id: u64,
    /// Group code.
    pub code: String,
    /// Group description.
    pub description: String,
    /// Employee assigned to the group.
    pub emp_code: String,
    /// Device the group clocks in on.
    pub device_name: String,
}

impl SetupRecord for GroupSchedule {
    const KIND: SetupKind = SetupKind::GroupSchedule;

    fn from_fields(values: &FieldValues) -> AppResult<Self> {
        let id_field = &GROUP_SCHEDULE_FIELDS[0];
        Ok(Self {
            id: parse_integer(id_field, values.get("id").trim())?,
            code: values.get("code").to_owned(),
            description: values.get("description").to_owned(),
            emp_code: values.get("empCode").to_owned(),
            device_name: values.get("deviceName").to_owned(),
        })
    }

    fn to_fields(&self) -> FieldValues {
        FieldValues::new()
            .with("id", self.id.to_string())
            .with("code", self.code.as_str())
            .with("description", self.description.as_str())
            .with("empCode", self.emp_code.as_str())
            .with("deviceName", self.device_name.as_str())
    }

    fn code(&self) -> &str {
        self.code.as_str()
    }

    fn record_key(&self) -> String {
        keyed_by_id(self.id, self.code.as_str())
    }
}

/// Timekeeping device configuration row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SdkEntry {
    /// Server-assigned identifier; zero before the first save.
    pub id: u64,
    /// Device name, unique across devices.
    pub device_name: String,
    /// Device IP address.
    pub ip_address: String,
    /// Device port.
    pub port: u64,
    /// Device serial number.
    pub serial_number: String,
}

impl SetupRecord for SdkEntry {
    const KIND: SetupKind = SetupKind::SdkEntry;

    fn from_fields(values: &FieldValues) -> AppResult<Self> {
        Ok(Self {
            id: parse_integer(&SDK_ENTRY_FIELDS[0], values.get("id").trim())?,
            device_name: values.get("code").to_owned(),
            ip_address: values.get("ipAddress").to_owned(),
            port: parse_integer(&SDK_ENTRY_FIELDS[3], values.get("port").trim())?,
            serial_number: values.get("serialNumber").to_owned(),
        })
    }

    fn to_fields(&self) -> FieldValues {
        FieldValues::new()
            .with("id", self.id.to_string())
            .with("code", self.device_name.as_str())
            .with("ipAddress", self.ip_address.as_str())
            .with("port", self.port.to_string())
            .with("serialNumber", self.serial_number.as_str())
    }

    fn code(&self) -> &str {
        self.device_name.as_str()
    }

    fn record_key(&self) -> String {
        keyed_by_id(self.id, self.device_name.as_str())
    }
}

/// Holiday overtime rate row.
#[derive(Debug, Clone, PartialEq)]
pub struct HolidayOtRate {
    /// Overtime code.
    pub ot_code: String,
    /// Rate description.
    pub description: String,
    /// Pay multiplier.
    pub rate: f64,
    /// DTR flag the rate applies to.
    pub dtr_flag: String,
}

impl SetupRecord for HolidayOtRate {
    const KIND: SetupKind = SetupKind::HolidayOtRate;

    fn from_fields(values: &FieldValues) -> AppResult<Self> {
        Ok(Self {
            ot_code: values.get("code").to_owned(),
            description: values.get("description").to_owned(),
            rate: parse_decimal(&HOLIDAY_OT_RATE_FIELDS[2], values.get("rate").trim())?,
            dtr_flag: values.get("dtrFlag").to_owned(),
        })
    }

    fn to_fields(&self) -> FieldValues {
        FieldValues::new()
            .with("code", self.ot_code.as_str())
            .with("description", self.description.as_str())
            .with("rate", self.rate.to_string())
            .with("dtrFlag", self.dtr_flag.as_str())
    }

    fn code(&self) -> &str {
        self.ot_code.as_str()
    }
}

fn keyed_by_id(id: u64, code: &str) -> String {
    if id > 0 {
        id.to_string()
    } else {
        code.to_owned()
    }
}
