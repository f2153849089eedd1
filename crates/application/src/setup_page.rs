use std::collections::HashMap;
use std::sync::Arc;

use chronopay_core::{AppError, AppResult};
use chronopay_domain::{
    AccessType, CapabilityMap, ModalStack, Overlay, ReferenceKind, SetupRecord, matches_search,
};
use tracing::info;

use crate::{
    CollectionLoader, DeleteOutcome, DialogPort, PermissionResolver, RecordEditor,
    ReferenceErrorPolicy, ReferenceGateway, SaveOutcome, SearchSelect, Selection, SetupGateway,
    TableView,
};


/// Services a setup page is built from.
#[derive(Clone)]
pub struct PageContext {
    /// Setup list backend.
    pub setup_gateway: Arc<dyn SetupGateway>,
    /// Reference list backend for pickers.
    pub reference_gateway: Arc<dyn ReferenceGateway>,
    /// Dialog surface.
    pub dialogs: Arc<dyn DialogPort>,
    /// Behaviour when a picker list fails to load.
    pub reference_error_policy: ReferenceErrorPolicy,
}

/// One setup screen: capabilities, list, table, editor, pickers and the
/// overlay stack.
pub struct SetupPage<R: SetupRecord> {
    context: PageContext,
    capabilities: CapabilityMap,
    loader: CollectionLoader<R>,
    table: TableView<R>,
    editor: RecordEditor<R>,
    pickers: HashMap<ReferenceKind, SearchSelect>,
    modals: ModalStack,
}

fn record_matches<R: SetupRecord>(record: &R, term: &str) -> bool {
    matches_search(R::KIND.fields(), &record.to_fields(), term)
}

impl<R: SetupRecord> SetupPage<R> {
    /// Enters the page: resolves capabilities, requires `View` and loads the
    /// list.
    pub async fn mount(resolver: &PermissionResolver, context: PageContext) -> AppResult<Self> {
        let capabilities = resolver.resolve(R::KIND.form_name());
        Self::with_capabilities(capabilities, context).await
    }

    /// Enters the page with already resolved capabilities.
    pub async fn with_capabilities(
        capabilities: CapabilityMap,
        context: PageContext,
    ) -> AppResult<Self> {
        capabilities.require(AccessType::View)?;

        let mut page = Self {
            loader: CollectionLoader::new(context.setup_gateway.clone()),
            table: TableView::new(R::KIND.page_size(), record_matches::<R>)?,
            editor: RecordEditor::new(context.setup_gateway.clone(), context.dialogs.clone()),
            pickers: HashMap::new(),
            modals: ModalStack::new(),
            capabilities,
            context,
        };
        page.refresh().await;
        info!(form_name = R::KIND.form_name(), "setup page mounted");
        Ok(page)
    }

    /// Returns the capabilities resolved on entry.
    #[must_use]
    pub fn capabilities(&self) -> &CapabilityMap {
        &self.capabilities
    }

    /// Returns the list loader.
    #[must_use]
    pub fn loader(&self) -> &CollectionLoader<R> {
        &self.loader
    }

    /// Returns the table.
    #[must_use]
    pub fn table(&self) -> &TableView<R> {
        &self.table
    }

    /// Returns the table for paging.
    pub fn table_mut(&mut self) -> &mut TableView<R> {
        &mut self.table
    }

    /// Returns the editor.
    #[must_use]
    pub fn editor(&self) -> &RecordEditor<R> {
        &self.editor
    }

    /// Returns the editor for field input.
    pub fn editor_mut(&mut self) -> &mut RecordEditor<R> {
        &mut self.editor
    }

    /// Returns the picker for a reference kind, once opened.
    #[must_use]
    pub fn picker(&self, kind: ReferenceKind) -> Option<&SearchSelect> {
        self.pickers.get(&kind)
    }

    /// Returns the picker for search and paging, once opened.
    pub fn picker_mut(&mut self, kind: ReferenceKind) -> Option<&mut SearchSelect> {
        self.pickers.get_mut(&kind)
    }

    /// Returns the overlay stack.
    #[must_use]
    pub fn modals(&self) -> &ModalStack {
        &self.modals
    }

    /// Reloads the list and refilters the table.
    pub async fn refresh(&mut self) {
        let items = self.loader.fetch().await.items.clone();
        self.table.set_items(items);
    }

    /// Changes the table search term.
    pub fn set_search(&mut self, term: &str) {
        self.table.set_search(term);
    }

    /// Opens a blank editor; fails while the editor is already open.
    pub fn open_create(&mut self) -> AppResult<()> {
        self.ensure_editor_closed()?;
        self.editor.open_create(&self.capabilities)?;
        self.modals.push(Overlay::Editor);
        Ok(())
    }

    /// Opens the editor on the row at `position` of the current page.
    pub fn open_edit(&mut self, position: usize) -> AppResult<()> {
        self.ensure_editor_closed()?;
        let record = self.row_on_page(position)?;
        self.editor.open_edit(&self.capabilities, &record)?;
        self.modals.push(Overlay::Editor);
        Ok(())
    }

    /// Saves the editor; on success refreshes the list then closes the editor.
    pub async fn submit(&mut self) -> AppResult<SaveOutcome> {
        let outcome = self.editor.submit(self.loader.items()).await?;
        self.refresh().await;
        self.close_editor();
        Ok(outcome)
    }

    /// Deletes the row at `position` of the current page after confirmation.
    pub async fn delete(&mut self, position: usize) -> AppResult<DeleteOutcome> {
        let record = self.row_on_page(position)?;
        self.modals.push(Overlay::Confirm);
        let outcome = self.editor.delete(&self.capabilities, &record).await;
        self.modals.close_if(|overlay| *overlay == Overlay::Confirm);

        if matches!(outcome, Ok(DeleteOutcome::Deleted)) {
            self.refresh().await;
        }
        outcome
    }

    /// Closes the editor without saving.
    pub fn cancel_editor(&mut self) {
        self.close_editor();
    }

    /// Opens a picker over the editor, filling `target_field` on pick.
    pub async fn open_picker(
        &mut self,
        kind: ReferenceKind,
        target_field: &str,
    ) -> AppResult<()> {
        if !self.editor.is_open() {
            return Err(AppError::Validation(
                "pickers open from inside the editor".to_owned(),
            ));
        }

        let picker = match self.pickers.entry(kind) {
            std::collections::hash_map::Entry::Occupied(entry) => entry.into_mut(),
            std::collections::hash_map::Entry::Vacant(entry) => entry.insert(SearchSelect::new(
                kind,
                self.context.reference_gateway.clone(),
                self.context.dialogs.clone(),
                self.context.reference_error_policy,
            )?),
        };

        if let Some(previous_field) = picker.target_field() {
            self.modals.remove(&Overlay::SearchSelect {
                kind,
                target_field: previous_field.to_owned(),
            });
        }

        let overlay = Overlay::SearchSelect {
            kind,
            target_field: target_field.to_owned(),
        };
        self.modals.push(overlay.clone());
        if let Err(error) = picker.open(target_field).await {
            self.modals.remove(&overlay);
            return Err(error);
        }
        Ok(())
    }

    /// Picks a row of an open picker and writes it into the editor.
    pub fn pick(&mut self, kind: ReferenceKind, position: usize) -> Option<Selection> {
        let selection = self.pickers.get_mut(&kind)?.pick(position)?;
        self.modals.remove(&Overlay::SearchSelect {
            kind,
            target_field: selection.target_field.clone(),
        });
        self.editor
            .set_field(selection.target_field.as_str(), selection.entry.code.as_str());
        Some(selection)
    }

    /// Closes only the top-most overlay, as the Escape key does.
    pub fn handle_escape(&mut self) -> Option<Overlay> {
        let overlay = self.modals.close_top()?;
        match &overlay {
            Overlay::Editor => self.editor.cancel(),
            Overlay::SearchSelect { kind, .. } => {
                if let Some(picker) = self.pickers.get_mut(kind) {
                    picker.close();
                }
            }
            Overlay::Confirm => {}
        }
        Some(overlay)
    }

    fn close_editor(&mut self) {
        self.editor.close();
        for picker in self.pickers.values_mut() {
            picker.close();
        }
        self.modals = ModalStack::new();
    }

    fn ensure_editor_closed(&self) -> AppResult<()> {
        if self.editor.is_open() {
            return Err(AppError::Validation("the editor is already open".to_owned()));
        }
        Ok(())
    }

    fn row_on_page(&self, position: usize) -> AppResult<R> {
        self.table.page_row(position).cloned().ok_or_else(|| {
            AppError::NotFound(format!("no row at position {position} on this page"))
        })
    }
}
