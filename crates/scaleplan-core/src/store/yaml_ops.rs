//! Text editor operations for the PlanStateStore.

use log::debug;

use super::{Change, PlanStateStore};
use crate::{
    codec::{self, CodecMode},
    error::{Result, ScalingPlanError},
};

impl PlanStateStore {
    /// YAML of the current plan as shown in the editor (no `db_id`).
    pub fn yaml_code(&self) -> Result<String> {
        let (_, entry) = self.current_entry()?;
        codec::to_yaml(&entry.document, CodecMode::Display)
    }

    /// Replaces the current document with the edited YAML `text`.
    ///
    /// The storage identifier is kept, and selection and canvas positions
    /// follow items by id. Text that fails to parse yields
    /// [`ScalingPlanError::Parse`] and leaves the store unchanged.
    pub fn apply_yaml_code(&mut self, text: &str) -> Result<()> {
        let parsed = codec::parse(text)?;

        self.edit_current(Change::Content, |document, selected| {
            if parsed.id != document.id {
                return Err(ScalingPlanError::invalid_input("id").with_reason(format!(
                    "cannot rename plan '{}' to '{}' from the editor",
                    document.id, parsed.id
                )));
            }

            let mut parsed = parsed;
            parsed.db_id = document.db_id.clone();
            for item in &mut parsed.items {
                if let Some(previous) = document.item(&item.id) {
                    item.ui.position = previous.ui.position;
                }
                item.ui.selected = selected.as_deref() == Some(item.id.as_str());
            }
            if selected
                .as_deref()
                .is_some_and(|id| parsed.item(id).is_none())
            {
                *selected = None;
            }

            debug!("Applied edited YAML to plan {}", parsed.id);
            *document = parsed;
            Ok(())
        })
    }
}
