//! UI update handlers

use crate::commands::Cmd;
use crate::messages::UiMsg;
use crate::model::AppModel;

pub fn update_ui(model: &mut AppModel, msg: UiMsg) -> Option<Cmd> {
    match msg {
        UiMsg::DismissAlert => {
            model.ui.dismiss_alert()?;
            Some(Cmd::Redraw)
        }
    }
}
