//! Palette update handlers

use crate::commands::Cmd;
use crate::messages::PaletteMsg;
use crate::model::AppModel;

pub fn update_palette(model: &mut AppModel, msg: PaletteMsg) -> Option<Cmd> {
    let store = &mut model.palettes;

    match msg {
        PaletteMsg::Next => store.next(),
        PaletteMsg::DeleteCurrent => store.delete_current(),
        PaletteMsg::Insert { palette, at } => store.insert(palette, at),
        PaletteMsg::Append(palette) => store.append(palette),
        PaletteMsg::AddGlyphs(glyphs) => store.edit_current(|p| p.add_glyphs(&glyphs)),
        PaletteMsg::RemoveGlyph(glyph) => store.edit_current(|p| p.remove_glyph(&glyph)),
        PaletteMsg::Rename(name) => store.edit_current(|p| p.name = name),
    }

    tracing::debug!(
        "Palette store '{}': {} palettes, current '{}'",
        store.name(),
        store.len(),
        store.current().name
    );
    Some(Cmd::Redraw)
}
