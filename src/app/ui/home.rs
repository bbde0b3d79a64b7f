use std::path::PathBuf;

use eframe::egui::{self, Context, Key, RichText, Ui};

use crate::backend::{BackendClient, ProcessOutcome, UploadOutcome, is_json_export};
use crate::chat::GraphKind;

use super::super::render_utils::{ACCENT, ERROR_TEXT, MUTED_TEXT, PANEL_FILL, SUCCESS_TEXT};
use super::super::{HomePage, Route, Task};

const NOT_JSON: &str = "Please upload a JSON file.";
const PROCESSING: &str = "File processing.....";
const UPLOAD_ERROR: &str = "An error occurred while uploading.";
const PROCESS_ERROR: &str = "An error occurred while processing your username.";
const MISSING_USERNAME: &str = "Please enter your username.";

const INSTRUCTIONS: [&str; 7] = [
    "Open Discord and go to User Settings (gear icon next to your username).",
    "Scroll down and click on \"Privacy & Safety\".",
    "Scroll to the bottom and click on \"Request all of my Data\".",
    "Confirm your request and wait for Discord to email you (this may take up to 30 days).",
    "Once you receive the email, download the ZIP file containing your data.",
    "Extract the ZIP file and locate the JSON file for the chat you want to upload.",
    "Use the \"Upload JSON File\" button above to upload your chat data.",
];

/// Feedback line for a finished upload, and whether the page should go on
/// to ask for the uploader's username.
pub(in crate::app) fn upload_feedback(result: Result<UploadOutcome, String>) -> (String, bool) {
    match result {
        Ok(UploadOutcome::Accepted { task_id: Some(task_id) }) => {
            (format!("File uploaded successfully! (task {task_id})"), true)
        }
        Ok(UploadOutcome::Accepted { task_id: None }) => {
            ("File uploaded successfully!".to_owned(), true)
        }
        Ok(UploadOutcome::Rejected(error)) => (error, false),
        Err(_) => (UPLOAD_ERROR.to_owned(), false),
    }
}

/// `None` once the backend accepted the username, the message to show
/// otherwise.
pub(in crate::app) fn process_feedback(result: Result<ProcessOutcome, String>) -> Option<String> {
    match result {
        Ok(ProcessOutcome::Processed) => None,
        Ok(ProcessOutcome::Rejected(error)) => Some(error),
        Err(_) => Some(PROCESS_ERROR.to_owned()),
    }
}

pub(in crate::app) fn is_success_feedback(feedback: &str) -> bool {
    feedback.contains("successfully")
}

impl HomePage {
    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        client: &BackendClient,
        navigation: &mut Option<Route>,
    ) -> bool {
        self.poll_tasks(navigation);

        egui::TopBottomPanel::top("home_nav")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("Chat Constellation");
                    ui.separator();
                    if ui.button(GraphKind::Global.label()).clicked() {
                        *navigation = Some(Route::Graph(GraphKind::Global));
                    }
                    if ui.button(GraphKind::Local.label()).clicked() {
                        *navigation = Some(Route::Graph(GraphKind::Local));
                    }
                    if ui.button("Metrics").clicked() {
                        *navigation = Some(Route::Metrics);
                    }
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    ui.add_space(48.0);
                    ui.heading(RichText::new("Welcome to 3-Discord").size(40.0).strong());
                    ui.add_space(24.0);

                    egui::Frame::new()
                        .fill(PANEL_FILL)
                        .corner_radius(8.0)
                        .inner_margin(24.0)
                        .show(ui, |ui| {
                            ui.set_max_width(460.0);
                            self.draw_upload_form(ui, client);
                            ui.separator();
                            self.draw_instructions(ui);
                        });
                });
            });
        });

        self.upload.is_some() || self.process.is_some()
    }

    fn poll_tasks(&mut self, navigation: &mut Option<Route>) {
        if let Some(task) = &self.upload
            && let Some(result) = task.poll()
        {
            let (feedback, awaiting_username) = upload_feedback(result);
            log::info!("upload finished: {feedback}");
            self.feedback = Some(feedback);
            self.awaiting_username = awaiting_username;
            self.upload = None;
        }

        if let Some(task) = &self.process
            && let Some(result) = task.poll()
        {
            self.process = None;
            match process_feedback(result) {
                None => *navigation = Some(Route::Metrics),
                Some(feedback) => self.feedback = Some(feedback),
            }
        }
    }

    fn start_upload(&mut self, client: &BackendClient) {
        let path = PathBuf::from(self.file_path.trim());
        if !is_json_export(&path) {
            self.feedback = Some(NOT_JSON.to_owned());
            return;
        }

        self.feedback = Some(PROCESSING.to_owned());
        self.awaiting_username = false;
        let client = client.clone();
        self.upload = Some(Task::spawn("upload", move || client.upload(&path)));
    }

    fn start_process(&mut self, client: &BackendClient) {
        let username = self.username.trim().to_owned();
        if username.is_empty() {
            self.feedback = Some(MISSING_USERNAME.to_owned());
            return;
        }

        let client = client.clone();
        self.process = Some(Task::spawn("username processing", move || {
            client.process_username(&username)
        }));
    }

    fn draw_upload_form(&mut self, ui: &mut Ui, client: &BackendClient) {
        let busy = self.upload.is_some() || self.process.is_some();

        ui.label(RichText::new("Path to your chat export").color(MUTED_TEXT));
        let path_response = ui.add(
            egui::TextEdit::singleline(&mut self.file_path)
                .hint_text("/path/to/messages.json")
                .desired_width(f32::INFINITY),
        );
        let submitted_path =
            path_response.lost_focus() && ui.input(|input| input.key_pressed(Key::Enter));

        let upload_button = ui.add_enabled(
            !busy,
            egui::Button::new(RichText::new("Upload JSON File").strong()).fill(ACCENT),
        );
        if (upload_button.clicked() || submitted_path) && !busy {
            self.start_upload(client);
        }
        if busy {
            ui.spinner();
        }

        if let Some(feedback) = &self.feedback {
            let color = if is_success_feedback(feedback) {
                SUCCESS_TEXT
            } else {
                ERROR_TEXT
            };
            ui.add_space(6.0);
            ui.label(RichText::new(feedback.as_str()).color(color));
        }

        if self.awaiting_username {
            ui.add_space(10.0);
            ui.label("Which user are you in this chat?");
            let username_response = ui.add(
                egui::TextEdit::singleline(&mut self.username)
                    .hint_text("Your Discord username")
                    .desired_width(f32::INFINITY),
            );
            let submitted_username =
                username_response.lost_focus() && ui.input(|input| input.key_pressed(Key::Enter));
            let confirm = ui.add_enabled(!busy, egui::Button::new("Confirm username"));
            if (confirm.clicked() || submitted_username) && !busy {
                self.start_process(client);
            }
        }
    }

    fn draw_instructions(&self, ui: &mut Ui) {
        egui::CollapsingHeader::new("Instructions")
            .default_open(false)
            .show(ui, |ui| {
                ui.label(
                    RichText::new("How to download your Discord chat data as a JSON file:")
                        .strong(),
                );
                for (step, instruction) in INSTRUCTIONS.iter().enumerate() {
                    ui.label(RichText::new(format!("{}. {instruction}", step + 1)).color(MUTED_TEXT));
                }
            });
    }
}
