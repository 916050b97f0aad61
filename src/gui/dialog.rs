//! Message Dialogs
//! Centered message windows shown one at a time. While one is open the main
//! window is disabled.

use egui::{Color32, RichText};
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogLevel {
    Info,
    Warning,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MessageDialog {
    pub title: String,
    pub message: String,
    pub level: DialogLevel,
    pub monospace: bool,
}

impl MessageDialog {
    pub fn warning(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            level: DialogLevel::Warning,
            monospace: false,
        }
    }

    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            level: DialogLevel::Info,
            monospace: false,
        }
    }

    pub fn monospace(mut self) -> Self {
        self.monospace = true;
        self
    }
}

#[derive(Default)]
pub struct DialogQueue {
    pending: VecDeque<MessageDialog>,
}

impl DialogQueue {
    pub fn push(&mut self, dialog: MessageDialog) {
        self.pending.push_back(dialog);
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    #[cfg(test)]
    pub fn front(&self) -> Option<&MessageDialog> {
        self.pending.front()
    }

    /// Draw the front dialog; dismissing it reveals the next one.
    pub fn show(&mut self, ctx: &egui::Context) {
        let Some(dialog) = self.pending.front() else {
            return;
        };

        let mut dismissed = false;
        egui::Window::new(&dialog.title)
            .id(egui::Id::new("message_dialog"))
            .collapsible(false)
            .resizable(dialog.monospace)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    let (icon, color) = match dialog.level {
                        DialogLevel::Info => ("ℹ", Color32::from_rgb(100, 149, 237)),
                        DialogLevel::Warning => ("⚠", Color32::from_rgb(243, 156, 18)),
                    };
                    ui.label(RichText::new(icon).size(22.0).color(color));
                    ui.vertical(|ui| {
                        if dialog.monospace {
                            egui::ScrollArea::both()
                                .max_height(ctx.screen_rect().height() * 0.7)
                                .show(ui, |ui| {
                                    ui.label(RichText::new(&dialog.message).monospace().size(11.0));
                                });
                        } else {
                            ui.label(&dialog.message);
                        }
                    });
                });
                ui.add_space(8.0);
                ui.vertical_centered(|ui| {
                    if ui.button("OK").clicked() {
                        dismissed = true;
                    }
                });
            });

        if dismissed {
            self.pending.pop_front();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dialogs_are_shown_in_order() {
        let mut queue = DialogQueue::default();
        assert!(queue.is_empty());
        queue.push(MessageDialog::warning("Loading Error", "first"));
        queue.push(MessageDialog::info("Data Analysis", "second").monospace());

        let front = queue.front().unwrap();
        assert_eq!(front.title, "Loading Error");
        assert_eq!(front.level, DialogLevel::Warning);
        assert!(!front.monospace);
    }
}
