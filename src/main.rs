use anyhow::Error;
use gtk::prelude::*;
use gtk::{
    gdk::Display,
    Application,
    ApplicationWindow,
    Box as GtkBox,
    Button,
    ButtonsType,
    CssProvider,
    DropDown,
    Frame,
    HeaderBar,
    Label,
    MessageDialog,
    MessageType,
    Orientation,
    Separator,
    StringList,
    StringObject,
};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use protonup_gtk::about::AboutWindow;
use protonup_gtk::lock::{self, OperationLock};
use protonup_gtk::model::{confirm_prompt, format_version_columns, ActionKind, Release};
use protonup_gtk::progress::ProgressWindow;
use protonup_gtk::proton_manager;
use protonup_gtk::releases;

const VERSIONS_PER_ROW: usize = 4;

fn load_css() {
    let provider = CssProvider::new();
    provider.load_from_data(
        "
        .header-button {
            padding: 8px 16px;
            margin: 4px;
            border-radius: 8px;
            font-weight: bold;
        }

        .refresh-button {
            background: linear-gradient(135deg, #4CAF50, #45a049);
            color: white;
        }

        .update-button {
            background: linear-gradient(135deg, #2196F3, #1976D2);
            color: white;
        }

        .install-button {
            background: linear-gradient(135deg, #FF9800, #F57C00);
            color: white;
        }

        .uninstall-button {
            background: linear-gradient(135deg, #f44336, #d32f2f);
            color: white;
        }

        .version-label {
            font-family: monospace;
            font-size: 13px;
        }

        .link {
            color: #1976d2;
            text-decoration: underline;
        }

        window {
            background-color: #fafafa;
        }
        "
    );

    gtk::style_context_add_provider_for_display(
        &Display::default().expect("Could not connect to a display."),
        &provider,
        gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
    );
}

fn info_dialog(parent: &ApplicationWindow, text: &str) {
    let dialog = MessageDialog::builder()
        .transient_for(parent)
        .modal(true)
        .message_type(MessageType::Info)
        .buttons(ButtonsType::Ok)
        .text(text)
        .build();
    dialog.connect_response(|dlg, _| dlg.close());
    dialog.show();
}

fn error_dialog(parent: &ApplicationWindow, text: &str) {
    let dialog = MessageDialog::builder()
        .transient_for(parent)
        .modal(true)
        .message_type(MessageType::Error)
        .buttons(ButtonsType::Ok)
        .text(text)
        .build();
    dialog.connect_response(|dlg, _| dlg.close());
    dialog.show();
}

/// Yes/cancel prompt shown before update, install, and uninstall. `Yes` runs
/// `on_confirm`; cancel just returns to the main menu.
fn confirm_action<F: Fn() + 'static>(
    parent: &ApplicationWindow,
    action: ActionKind,
    tag: &str,
    on_confirm: F,
) {
    let dialog = MessageDialog::builder()
        .transient_for(parent)
        .modal(true)
        .message_type(MessageType::Question)
        .buttons(ButtonsType::YesNo)
        .text(&confirm_prompt(action, tag))
        .build();

    if action == ActionKind::Uninstall {
        if let Some(yes_button) = dialog.widget_for_response(gtk::ResponseType::Yes) {
            yes_button.add_css_class("destructive-action");
        }
    }

    dialog.connect_response(move |dialog, response| {
        if response == gtk::ResponseType::Yes {
            on_confirm();
        }
        dialog.close();
    });
    dialog.show();
}

fn selected_string(dropdown: &DropDown) -> Option<String> {
    dropdown
        .selected_item()
        .and_downcast::<StringObject>()
        .map(|s| s.string().to_string())
}

fn set_dropdown_items(dropdown: &DropDown, items: &[String]) {
    let refs: Vec<&str> = items.iter().map(|s| s.as_str()).collect();
    dropdown.set_model(Some(&StringList::new(&refs)));
}

/// Acquires the cross-process lock and hands the download/extract work to a
/// progress window. Refused if another operation already holds the marker.
fn start_install(window: &ApplicationWindow, release: Release, refresh: &Button) {
    let lock = match OperationLock::acquire() {
        Ok(lock) => lock,
        Err(err) => {
            error_dialog(
                window,
                &format!("❌ Another install or uninstall is already running:\n{:#}", err),
            );
            return;
        }
    };

    let progress = ProgressWindow::new(window);
    progress.show();
    if let Err(err) = progress.install_release_with_progress(release, lock, refresh.clone()) {
        error_dialog(window, &format!("❌ Installation error:\n{}", err));
    }
}

fn build_ui(app: &Application) {
    load_css();

    let window = ApplicationWindow::builder()
        .application(app)
        .title("ProtonUp GTK+")
        .default_width(560)
        .default_height(420)
        .build();
    window.set_icon_name(Some("steam"));

    // Adding header bar
    let header_bar = HeaderBar::new();
    header_bar.set_title_widget(Some(&Label::new(Some("🍷 ProtonUp"))));
    let about_btn = Button::with_label("About");
    about_btn.add_css_class("flat");
    header_bar.pack_end(&about_btn);
    window.set_titlebar(Some(&header_bar));

    let main_vbox = GtkBox::new(Orientation::Vertical, 0);

    // Top panel for buttons
    let button_panel = GtkBox::new(Orientation::Horizontal, 12);
    button_panel.set_margin_top(16);
    button_panel.set_margin_bottom(16);
    button_panel.set_margin_start(16);
    button_panel.set_margin_end(16);
    button_panel.set_halign(gtk::Align::Center);

    let refresh_btn = Button::with_label("🔄 Refresh");
    refresh_btn.add_css_class("header-button");
    refresh_btn.add_css_class("refresh-button");

    let update_btn = Button::with_label("⬆️ Update to Latest");
    update_btn.add_css_class("header-button");
    update_btn.add_css_class("update-button");

    button_panel.append(&refresh_btn);
    button_panel.append(&update_btn);
    main_vbox.append(&button_panel);

    let separator = Separator::new(Orientation::Horizontal);
    main_vbox.append(&separator);

    // Installed versions overview
    let installed_frame = Frame::new(None);
    installed_frame.set_margin_top(16);
    installed_frame.set_margin_bottom(16);
    installed_frame.set_margin_start(16);
    installed_frame.set_margin_end(16);

    let installed_box = GtkBox::new(Orientation::Vertical, 8);
    installed_box.set_margin_top(12);
    installed_box.set_margin_bottom(12);
    installed_box.set_margin_start(12);
    installed_box.set_margin_end(12);

    let installed_title = Label::new(Some("Installed Proton Versions"));
    installed_title.set_halign(gtk::Align::Start);
    installed_title.set_markup("<b>Installed Proton Versions</b>");

    let installed_label = Label::new(Some("Loading..."));
    installed_label.set_halign(gtk::Align::Start);
    installed_label.add_css_class("version-label");

    installed_box.append(&installed_title);
    installed_box.append(&installed_label);
    installed_frame.set_child(Some(&installed_box));
    main_vbox.append(&installed_frame);

    // Uninstall row
    let uninstall_row = GtkBox::new(Orientation::Horizontal, 12);
    uninstall_row.set_margin_bottom(12);
    uninstall_row.set_margin_start(16);
    uninstall_row.set_margin_end(16);

    let uninstall_title = Label::new(Some("Uninstall:"));
    uninstall_title.set_width_chars(9);
    uninstall_title.set_halign(gtk::Align::Start);

    let uninstall_dropdown = DropDown::from_strings(&[]);
    uninstall_dropdown.set_hexpand(true);

    let uninstall_btn = Button::with_label("🗑️ Uninstall");
    uninstall_btn.add_css_class("header-button");
    uninstall_btn.add_css_class("uninstall-button");

    uninstall_row.append(&uninstall_title);
    uninstall_row.append(&uninstall_dropdown);
    uninstall_row.append(&uninstall_btn);
    main_vbox.append(&uninstall_row);

    // Install row
    let install_row = GtkBox::new(Orientation::Horizontal, 12);
    install_row.set_margin_bottom(16);
    install_row.set_margin_start(16);
    install_row.set_margin_end(16);

    let install_title = Label::new(Some("Install:"));
    install_title.set_width_chars(9);
    install_title.set_halign(gtk::Align::Start);

    let install_dropdown = DropDown::from_strings(&[]);
    install_dropdown.set_hexpand(true);

    let install_btn = Button::with_label("⬇️ Install");
    install_btn.add_css_class("header-button");
    install_btn.add_css_class("install-button");

    install_row.append(&install_title);
    install_row.append(&install_dropdown);
    install_row.append(&install_btn);
    main_vbox.append(&install_row);

    window.set_child(Some(&main_vbox));
    window.present();

    // Remote releases currently offered by the install dropdown, and the
    // installed tags backing the uninstall dropdown.
    let available: Rc<RefCell<Vec<Release>>> = Rc::new(RefCell::new(Vec::new()));
    let installed: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));

    let about_parent = window.clone();
    about_btn.connect_clicked(move |_| {
        AboutWindow::new(&about_parent).present();
    });

    let refresh_window = window.clone();
    let uninstall_dropdown_clone = uninstall_dropdown.clone();
    let install_dropdown_clone = install_dropdown.clone();
    let available_clone = available.clone();
    let installed_clone = installed.clone();
    refresh_btn.connect_clicked(move |_| {
        // A running operation briefly delays the rebuild; a stale marker is
        // reported instead of freezing the main loop.
        if !lock::wait_until_idle(Duration::from_secs(2)) {
            info_dialog(
                &refresh_window,
                "⏳ An install or uninstall is still in progress. Try again in a moment.",
            );
            return;
        }

        let installed_tags = match proton_manager::installed_versions() {
            Ok(tags) => tags,
            Err(err) => {
                error_dialog(
                    &refresh_window,
                    &format!("❌ Could not read installed versions:\n{:#}", err),
                );
                Vec::new()
            }
        };

        if installed_tags.is_empty() {
            installed_label.set_markup("<i>No Proton versions installed yet.</i>");
        } else {
            installed_label.set_text(&format_version_columns(&installed_tags, VERSIONS_PER_ROW));
        }
        set_dropdown_items(&uninstall_dropdown_clone, &installed_tags);

        match releases::fetch_releases_cached() {
            Ok(remote) => {
                let new_releases = releases::filter_new_releases(&remote, &installed_tags);
                let tags: Vec<String> = new_releases.iter().map(|r| r.tag.clone()).collect();
                set_dropdown_items(&install_dropdown_clone, &tags);
                *available_clone.borrow_mut() = new_releases;
            }
            Err(err) => {
                error_dialog(
                    &refresh_window,
                    &format!("❌ Error while fetching releases:\n{:#}", err),
                );
                set_dropdown_items(&install_dropdown_clone, &[]);
                available_clone.borrow_mut().clear();
            }
        }

        *installed_clone.borrow_mut() = installed_tags;
    });

    let update_window = window.clone();
    let update_refresh = refresh_btn.clone();
    let update_installed = installed.clone();
    update_btn.connect_clicked(move |_| {
        let window = update_window.clone();
        let refresh = update_refresh.clone();
        let installed = update_installed.clone();
        confirm_action(&update_window, ActionKind::Update, "", move || {
            match releases::fetch_latest_release() {
                Ok(latest) => {
                    if installed.borrow().contains(&latest.tag) {
                        info_dialog(
                            &window,
                            &format!("✅ Proton {} is already installed.", latest.tag),
                        );
                    } else {
                        start_install(&window, latest, &refresh);
                    }
                }
                Err(err) => {
                    error_dialog(
                        &window,
                        &format!("❌ Could not determine the latest release:\n{:#}", err),
                    );
                }
            }
        });
    });

    let install_window = window.clone();
    let install_refresh = refresh_btn.clone();
    let install_available = available.clone();
    install_btn.connect_clicked(move |_| {
        let Some(tag) = selected_string(&install_dropdown) else {
            info_dialog(&install_window, "⚠️ Please select a version to install.");
            return;
        };
        let Some(release) = install_available
            .borrow()
            .iter()
            .find(|r| r.tag == tag)
            .cloned()
        else {
            info_dialog(&install_window, "⚠️ Please select a version to install.");
            return;
        };

        let window = install_window.clone();
        let refresh = install_refresh.clone();
        let release_tag = release.tag.clone();
        confirm_action(&install_window, ActionKind::Install, &release_tag, move || {
            start_install(&window, release.clone(), &refresh);
        });
    });

    let uninstall_window = window.clone();
    let uninstall_refresh = refresh_btn.clone();
    uninstall_btn.connect_clicked(move |_| {
        let Some(tag) = selected_string(&uninstall_dropdown) else {
            info_dialog(&uninstall_window, "⚠️ Please select a version to uninstall.");
            return;
        };

        let window = uninstall_window.clone();
        let refresh = uninstall_refresh.clone();
        let tag_clone = tag.clone();
        confirm_action(&uninstall_window, ActionKind::Uninstall, &tag, move || {
            let _lock = match OperationLock::acquire() {
                Ok(lock) => lock,
                Err(err) => {
                    error_dialog(
                        &window,
                        &format!(
                            "❌ Another install or uninstall is already running:\n{:#}",
                            err
                        ),
                    );
                    return;
                }
            };

            match proton_manager::uninstall(&tag_clone) {
                Ok(()) => {
                    info_dialog(&window, &format!("✅ Proton {} uninstalled.", tag_clone));
                }
                Err(err) => {
                    error_dialog(&window, &format!("❌ Uninstall error:\n{:#}", err));
                }
            }
            refresh.emit_clicked();
        });
    });

    // The original blocked here for as long as another process held the
    // marker; bounded so a stale file cannot wedge startup forever.
    if !lock::wait_until_idle(Duration::from_secs(15)) {
        eprintln!(
            "lock marker {} still present after waiting, continuing anyway",
            lock::LOCK_PATH
        );
    }
    refresh_btn.emit_clicked();
}

fn main() -> Result<(), Error> {
    let app = Application::builder()
        .application_id("org.draugeros.ProtonUp")
        .build();

    app.connect_activate(build_ui);
    app.run();
    Ok(())
}
