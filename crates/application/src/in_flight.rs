/// Holds a busy flag raised until dropped.
///
/// Clearing on drop keeps the flag accurate when the caller abandons the
/// request future before it completes.
pub(crate) struct InFlight<'a> {
    flag: &'a mut bool,
}

impl<'a> InFlight<'a> {
    /// Raises `flag` for the lifetime of the guard.
    pub(crate) fn begin(flag: &'a mut bool) -> Self {
        *flag = true;
        Self { flag }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        *self.flag = false;
    }
}
