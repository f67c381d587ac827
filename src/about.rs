// src/about.rs

use gtk::prelude::*;
use gtk::{
    ApplicationWindow, Box as GtkBox, Button, HeaderBar, Label, Orientation, Window,
};

pub struct AboutWindow;

impl AboutWindow {
    pub fn new(parent: &ApplicationWindow) -> Window {
        let window = Window::builder()
            .transient_for(parent)
            .modal(true)
            .title("About ProtonUp")
            .default_width(380)
            .default_height(320)
            .resizable(false)
            .build();

        // Header bar
        let header_bar = HeaderBar::new();
        header_bar.set_title_widget(Some(&Label::new(Some("About"))));
        window.set_titlebar(Some(&header_bar));

        let main_vbox = GtkBox::new(Orientation::Vertical, 0);
        main_vbox.set_halign(gtk::Align::Center);
        main_vbox.set_valign(gtk::Align::Center);
        main_vbox.set_margin_top(30);
        main_vbox.set_margin_bottom(30);
        main_vbox.set_margin_start(40);
        main_vbox.set_margin_end(40);

        let logo_label = Label::new(Some("🍷"));
        logo_label.set_markup("<span size='xx-large'>🍷</span>");
        logo_label.set_halign(gtk::Align::Center);
        logo_label.set_margin_bottom(20);
        main_vbox.append(&logo_label);

        // title
        let title_label = Label::new(Some("ProtonUp GTK+"));
        title_label.set_markup("<span size='x-large' weight='bold'>ProtonUp GTK+</span>");
        title_label.set_halign(gtk::Align::Center);
        title_label.set_margin_bottom(8);
        main_vbox.append(&title_label);

        // Version
        let version_label = Label::new(Some("Version 0.5"));
        version_label.set_markup("<span size='medium'>Version 0.5</span>");
        version_label.set_halign(gtk::Align::Center);
        version_label.set_margin_bottom(8);
        main_vbox.append(&version_label);

        // Release source
        let source_container = GtkBox::new(Orientation::Horizontal, 0);
        source_container.set_halign(gtk::Align::Center);
        source_container.set_margin_bottom(8);

        let source_label = Label::new(Some("Releases by "));
        source_label.set_markup("<span size='medium'>Releases by </span>");

        let link_button = Button::with_label("@GloriousEggroll");
        link_button.set_has_frame(false);
        link_button.add_css_class("link");

        // Link
        link_button.connect_clicked(|_| {
            if let Err(e) = open::that("https://github.com/GloriousEggroll/proton-ge-custom/releases") {
                eprintln!("The link could not be opened: {}", e);
            }
        });

        source_container.append(&source_label);
        source_container.append(&link_button);
        main_vbox.append(&source_container);

        // Description
        let description_label = Label::new(Some(
            "A GTK front-end for installing and managing Proton compatibility tool releases for Steam",
        ));
        description_label.set_markup(
            "<span size='small' style='italic'>A GTK front-end for installing and managing Proton compatibility tool releases for Steam</span>",
        );
        description_label.set_halign(gtk::Align::Center);
        description_label.set_wrap(true);
        description_label.set_max_width_chars(50);
        description_label.set_margin_bottom(8);
        main_vbox.append(&description_label);

        // License
        let license_label = Label::new(Some("Licensed under the GNU General Public License v2.0"));
        license_label.set_markup("<span size='xx-small' alpha='70%'>Licensed under the GNU General Public License v2.0</span>");
        license_label.set_halign(gtk::Align::Center);
        license_label.set_wrap(true);
        license_label.set_max_width_chars(60);
        license_label.set_margin_bottom(17);
        main_vbox.append(&license_label);

        let close_button = Button::with_label("Close");
        close_button.set_halign(gtk::Align::Center);
        close_button.set_size_request(100, 35);
        close_button.add_css_class("suggested-action");

        let window_clone = window.clone();
        close_button.connect_clicked(move |_| {
            window_clone.close();
        });

        main_vbox.append(&close_button);

        window.set_child(Some(&main_vbox));
        window
    }
}
