//! View-model for the in-page controls and status line.

use serde::Serialize;

use crate::commands::Control;
use crate::state::PlaybackState;

pub const LOADING_MESSAGE: &str = "Loading Spine animation...";

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ControlButton {
    #[serde(skip)]
    pub control: Control,
    pub label: &'static str,
    /// Highlighted as the current selection.
    pub active: bool,
}

/// What the controls row and status line should show.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlsView {
    /// Empty until the viewer is loaded.
    pub buttons: Vec<ControlButton>,
    pub loading_message: Option<&'static str>,
    pub status_line: Option<String>,
}

impl ControlsView {
    pub fn build(state: Option<&PlaybackState>) -> Self {
        let Some(state) = state else {
            return Self {
                buttons: Vec::new(),
                loading_message: Some(LOADING_MESSAGE),
                status_line: None,
            };
        };

        let buttons = Control::all()
            .map(|control| match control {
                Control::Clip(clip) => ControlButton {
                    control,
                    label: clip.label(),
                    active: clip == state.current_clip,
                },
                Control::PlayPause => ControlButton {
                    control,
                    label: if state.is_playing { "Pause" } else { "Play" },
                    active: false,
                },
            })
            .collect();

        Self {
            buttons,
            loading_message: None,
            status_line: Some(format!("Current: {}", state.current_clip)),
        }
    }

    pub fn button(&self, control: Control) -> Option<&ControlButton> {
        self.buttons.iter().find(|b| b.control == control)
    }
}
