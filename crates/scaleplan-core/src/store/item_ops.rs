//! Plan item operations for the PlanStateStore.

use super::{Change, PlanStateStore};
use crate::{
    error::{Result, ScalingPlanError},
    models::{NodePosition, PlanItem, ScalingPlanDocument, Trigger},
    params::PlanItemPatch,
};

impl PlanStateStore {
    /// Appends an empty item to the current plan and returns its id.
    ///
    /// Ids follow `plan_{n}` starting at one past the item count and skip
    /// ids already taken, so `[plan_1, plan_3]` gets `plan_4`.
    pub fn add_plan_item(&mut self) -> Result<String> {
        self.edit_current(Change::Content, |document, _| {
            let id = next_item_id(document);
            document
                .items
                .push(PlanItem::new(id.as_str(), Trigger::Expression(String::new())));
            Ok(id)
        })
    }

    /// Merges the fields set in `patch` into the item `item_id`.
    pub fn update_plan_item(&mut self, item_id: &str, patch: &PlanItemPatch) -> Result<()> {
        self.edit_current(Change::Content, |document, _| {
            let item = item_mut(document, item_id)?;
            if let Some(description) = &patch.description {
                item.description = Some(description.clone()).filter(|d| !d.is_empty());
            }
            if let Some(priority) = patch.priority {
                item.priority = priority;
            }
            if let Some(trigger) = &patch.trigger {
                item.trigger = trigger.clone();
            }
            if let Some(components) = &patch.scaling_components {
                item.scaling_components = components.clone();
            }
            Ok(())
        })
    }

    /// Removes the item `item_id`; a selection pointing at it is cleared.
    pub fn remove_plan_item(&mut self, item_id: &str) -> Result<()> {
        self.edit_current(Change::Content, |document, selected| {
            let index = document
                .item_index(item_id)
                .ok_or_else(|| item_not_found(document, item_id))?;
            document.items.remove(index);
            if selected.as_deref() == Some(item_id) {
                *selected = None;
            }
            Ok(())
        })
    }

    /// Selects exactly one item of the current plan.
    pub fn select_plan_item(&mut self, item_id: &str) -> Result<()> {
        self.edit_current(Change::View, |document, selected| {
            if document.item(item_id).is_none() {
                return Err(item_not_found(document, item_id));
            }
            for item in &mut document.items {
                item.ui.selected = item.id == item_id;
            }
            *selected = Some(item_id.to_string());
            Ok(())
        })
    }

    pub fn clear_selection(&mut self) -> Result<()> {
        self.edit_current(Change::View, |document, selected| {
            for item in &mut document.items {
                item.ui.selected = false;
            }
            *selected = None;
            Ok(())
        })
    }

    /// Records where the item node sits on the canvas.
    pub fn move_plan_item(&mut self, item_id: &str, position: NodePosition) -> Result<()> {
        self.edit_current(Change::View, |document, _| {
            item_mut(document, item_id)?.ui.position = Some(position);
            Ok(())
        })
    }
}

fn next_item_id(document: &ScalingPlanDocument) -> String {
    let mut n = document.items.len() + 1;
    loop {
        let id = format!("plan_{n}");
        if document.item(&id).is_none() {
            return id;
        }
        n += 1;
    }
}

fn item_mut<'d>(document: &'d mut ScalingPlanDocument, item_id: &str) -> Result<&'d mut PlanItem> {
    let index = document
        .item_index(item_id)
        .ok_or_else(|| item_not_found(document, item_id))?;
    Ok(&mut document.items[index])
}

fn item_not_found(document: &ScalingPlanDocument, item_id: &str) -> ScalingPlanError {
    ScalingPlanError::PlanItemNotFound {
        plan_id: document.id.clone(),
        item_id: item_id.to_string(),
    }
}
