//! # Content Flattener
//!
//! Turns a [`Document`] into the flat, ordered sequence of [`FlowUnit`]s the
//! paginator works on. Paragraphs and panels map one to one. A list region
//! is replaced by its expansion: one panel per bound item, in collection
//! order. The region itself never appears in the output.

use crate::model::{Block, Document, FlowUnit, TextBlock, UnitContent};
use crate::template;
use crate::PrintError;

/// Flatten `document` into flow units indexed from 0.
///
/// A list region that cannot be materialised fails the whole call; dropping
/// its items would leave a hole in the printed document.
pub fn flatten(document: &Document) -> Result<Vec<FlowUnit>, PrintError> {
    let mut units = Vec::new();

    for (block_index, block) in document.blocks.iter().enumerate() {
        match block {
            Block::Paragraph { content, style } => {
                let text = TextBlock::new(content, *style);
                units.push(FlowUnit::new(units.len(), UnitContent::Paragraph(text)));
            }
            Block::Panel { parts } => {
                units.push(FlowUnit::new(
                    units.len(),
                    UnitContent::Panel {
                        parts: parts.clone(),
                    },
                ));
            }
            Block::List {
                items,
                template,
                binding,
            } => {
                let bound = template::resolve_items(items, &document.data)
                    .ok_or(PrintError::InvalidItemsSource { block: block_index })?;
                if bound.is_empty() {
                    continue;
                }
                let template = template
                    .as_ref()
                    .ok_or(PrintError::MissingItemTemplate { block: block_index })?;

                for (item_index, item) in bound.iter().enumerate() {
                    let parts = template::materialize(template, binding, item, &document.data)
                        .map_err(|message| PrintError::Template {
                            block: block_index,
                            item: item_index,
                            message,
                        })?;
                    units.push(FlowUnit::new(units.len(), UnitContent::Panel { parts }));
                }
            }
        }
    }

    log::debug!(
        "Flattened {} block(s) into {} unit(s)",
        document.blocks.len(),
        units.len()
    );
    Ok(units)
}
