use gtk::prelude::*;
use gtk::{
    glib, ApplicationWindow, Box as GtkBox, Button, ButtonsType, HeaderBar, Label,
    MessageDialog, MessageType, Orientation, ProgressBar, ScrolledWindow, TextBuffer,
    TextView, Window,
};
use std::fs;
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Error;

use crate::lock::OperationLock;
use crate::model::Release;
use crate::proton_manager;

pub struct ProgressWindow {
    pub window: Window,
    pub progress_bar: ProgressBar,
    pub log_view: TextView,
    pub log_buffer: TextBuffer,
    pub status_label: Label,
}

impl ProgressWindow {
    pub fn new(parent: &ApplicationWindow) -> Self {
        let window = Window::builder()
            .transient_for(parent)
            .modal(true)
            .title("Installation Progress")
            .default_width(600)
            .default_height(400)
            .build();

        // Header bar
        let header_bar = HeaderBar::new();
        header_bar.set_title_widget(Some(&Label::new(Some("🍷 Installation Progress"))));
        window.set_titlebar(Some(&header_bar));

        let main_vbox = GtkBox::new(Orientation::Vertical, 12);
        main_vbox.set_margin_top(16);
        main_vbox.set_margin_bottom(16);
        main_vbox.set_margin_start(16);
        main_vbox.set_margin_end(16);

        // Status label
        let status_label = Label::new(Some("Getting ready..."));
        status_label.set_halign(gtk::Align::Start);
        status_label.set_markup("<b>Getting ready...</b>");
        main_vbox.append(&status_label);

        // Progress bar
        let progress_bar = ProgressBar::new();
        progress_bar.set_show_text(true);
        progress_bar.set_text(Some("0%"));
        main_vbox.append(&progress_bar);

        // Log display area
        let log_buffer = TextBuffer::new(None::<&gtk::TextTagTable>);
        let log_view = TextView::with_buffer(&log_buffer);
        log_view.set_editable(false);
        log_view.set_cursor_visible(false);
        log_view.set_monospace(true);

        let scrolled_window = ScrolledWindow::builder()
            .vexpand(true)
            .hexpand(true)
            .build();
        scrolled_window.set_child(Some(&log_view));
        main_vbox.append(&scrolled_window);

        window.set_child(Some(&main_vbox));

        Self {
            window,
            progress_bar,
            log_view,
            log_buffer,
            status_label,
        }
    }

    pub fn show(&self) {
        self.window.show();
    }

    pub fn close(&self) {
        self.window.close();
    }

    pub fn set_progress(&self, fraction: f64, text: &str) {
        self.progress_bar.set_fraction(fraction);
        self.progress_bar.set_text(Some(text));
    }

    pub fn set_status(&self, status: &str) {
        self.status_label.set_markup(&format!("<b>{}</b>", status));
    }

    pub fn append_log(&self, text: &str) {
        let mut end_iter = self.log_buffer.end_iter();
        self.log_buffer.insert(&mut end_iter, &format!("{}\n", text));

        // Auto scroll - keep the newest line visible
        let mark = self.log_buffer.create_mark(None, &end_iter, false);
        self.log_view.scroll_mark_onscreen(&mark);
    }

    /// Downloads and extracts `release` on a worker thread while this window
    /// shows progress. The lock guard travels with the worker and is released
    /// when the operation ends; `refresh` is clicked afterwards so the main
    /// menu re-renders.
    pub fn install_release_with_progress(
        &self,
        release: Release,
        lock: OperationLock,
        refresh: Button,
    ) -> Result<(), Error> {
        let (tx, rx) = mpsc::channel::<ProgressMessage>();

        // clone UI elements
        let progress_bar = self.progress_bar.clone();
        let status_label = self.status_label.clone();
        let log_buffer = self.log_buffer.clone();
        let log_view = self.log_view.clone();
        let window = self.window.clone();

        let rx = Arc::new(Mutex::new(rx));
        let rx_clone = rx.clone();

        // Start background thread
        thread::spawn(move || {
            let _lock = lock;

            let _ = tx.send(ProgressMessage::Status(format!(
                "Downloading Proton {}...",
                release.tag
            )));
            let _ = tx.send(ProgressMessage::Progress(0.05, "5%".to_string()));
            let _ = tx.send(ProgressMessage::Log(format!(
                "Fetching {}",
                release.download_url
            )));

            let result = (|| -> anyhow::Result<()> {
                let progress_tx = tx.clone();
                let mut last_update = Instant::now();
                let mut on_chunk = move |received: u64, total: u64| {
                    // Throttle: a message per 8 KiB chunk would flood the UI.
                    if last_update.elapsed() < Duration::from_millis(100) {
                        return;
                    }
                    last_update = Instant::now();
                    if total > 0 {
                        let fraction = 0.05 + 0.8 * (received as f64 / total as f64).min(1.0);
                        let percent = (fraction * 100.0) as i32;
                        let _ = progress_tx
                            .send(ProgressMessage::Progress(fraction, format!("{}%", percent)));
                    }
                };

                let tarball = proton_manager::download_tarball(&release, &mut on_chunk)?;

                let install_dir = proton_manager::install_dir();
                let _ = tx.send(ProgressMessage::Progress(0.9, "90%".to_string()));
                let _ = tx.send(ProgressMessage::Status(format!(
                    "Extracting Proton {}...",
                    release.tag
                )));
                let _ = tx.send(ProgressMessage::Log(format!(
                    "Extracting {} into {}",
                    tarball.display(),
                    install_dir.display()
                )));

                proton_manager::unpack_tarball(&tarball, &install_dir)?;

                if let Err(e) = fs::remove_file(&tarball) {
                    let _ = tx.send(ProgressMessage::Log(format!(
                        "Could not remove {}: {}",
                        tarball.display(),
                        e
                    )));
                }
                Ok(())
            })();

            match result {
                Ok(()) => {
                    let _ = tx.send(ProgressMessage::Progress(1.0, "100%".to_string()));
                    let _ = tx.send(ProgressMessage::Status(format!(
                        "✅ Proton {} installed!",
                        release.tag
                    )));
                    let _ = tx.send(ProgressMessage::Log("Installation completed.".to_string()));
                    let _ = tx.send(ProgressMessage::Success);
                }
                Err(e) => {
                    let _ = tx.send(ProgressMessage::Error(format!("{:#}", e)));
                }
            }
        });

        // Check messages periodically
        glib::timeout_add_local(Duration::from_millis(100), move || {
            let mut messages_to_process = Vec::new();

            // Get all available messages
            if let Ok(rx_guard) = rx_clone.try_lock() {
                while let Ok(msg) = rx_guard.try_recv() {
                    messages_to_process.push(msg);
                }
            }

            // Process messages
            for msg in messages_to_process {
                match msg {
                    ProgressMessage::Status(status) => {
                        status_label.set_markup(&format!("<b>{}</b>", status));
                    }
                    ProgressMessage::Progress(fraction, text) => {
                        progress_bar.set_fraction(fraction);
                        progress_bar.set_text(Some(&text));
                    }
                    ProgressMessage::Log(log) => {
                        let mut end_iter = log_buffer.end_iter();
                        log_buffer.insert(&mut end_iter, &format!("{}\n", log));

                        // Auto scroll
                        let mark = log_buffer.create_mark(None, &end_iter, false);
                        log_view.scroll_mark_onscreen(&mark);
                    }
                    ProgressMessage::Error(error) => {
                        status_label
                            .set_markup(&format!("<b><span color='red'>❌ Error: {}</span></b>", error));

                        let dialog = MessageDialog::builder()
                            .transient_for(&window)
                            .modal(true)
                            .message_type(MessageType::Error)
                            .buttons(ButtonsType::Ok)
                            .text(&format!("❌ Installation error:\n{}", error))
                            .build();
                        let window_clone = window.clone();
                        let refresh_clone = refresh.clone();
                        dialog.connect_response(move |dlg, _| {
                            dlg.close();
                            window_clone.close();
                            refresh_clone.emit_clicked();
                        });
                        dialog.show();

                        return glib::ControlFlow::Break;
                    }
                    ProgressMessage::Success => {
                        glib::timeout_add_seconds_local(2, {
                            let window = window.clone();
                            let refresh = refresh.clone();
                            move || {
                                window.close();
                                refresh.emit_clicked();
                                glib::ControlFlow::Break
                            }
                        });

                        return glib::ControlFlow::Break;
                    }
                }
            }

            glib::ControlFlow::Continue
        });

        Ok(())
    }
}

#[derive(Debug)]
pub enum ProgressMessage {
    Status(String),
    Progress(f64, String),
    Log(String),
    Error(String),
    Success,
}
