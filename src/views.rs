use chrono::Timelike;
use std::fmt::Write;

use crate::{
    models::Identity,
    router::{LOADING_MESSAGE, Screen, Section, ShellView},
};

/// SectionView
///
/// A renderable content unit. The router hands it an identity that has already
/// been authorized for the section; views never re-check roles themselves.
pub trait SectionView: Send + Sync {
    fn title(&self) -> &str;

    fn render(&self, identity: &Identity) -> String;
}

/// greeting_for_hour
pub fn greeting_for_hour(hour: u32) -> &'static str {
    if hour < 12 {
        "Good Morning"
    } else if hour < 18 {
        "Good Afternoon"
    } else {
        "Good Evening"
    }
}

/// DashboardView
///
/// Landing section, reachable by every role.
pub struct DashboardView;

impl SectionView for DashboardView {
    fn title(&self) -> &str {
        "Dashboard"
    }

    fn render(&self, identity: &Identity) -> String {
        let hour = chrono::Local::now().hour();
        format!(
            "{}, {}!\nSigned in as {} ({}).",
            greeting_for_hour(hour),
            identity.full_name,
            identity.email,
            identity.role
        )
    }
}

/// PlaceholderView
///
/// Stands in for a CRUD section owned by another part of the front-end.
pub struct PlaceholderView {
    pub title: &'static str,
    pub summary: &'static str,
}

impl SectionView for PlaceholderView {
    fn title(&self) -> &str {
        self.title
    }

    fn render(&self, identity: &Identity) -> String {
        format!("{}\nViewing as {}.", self.summary, identity.full_name)
    }
}

/// ContentViews
///
/// Maps every `Section` to its view. Built complete, so lookups cannot miss.
pub struct ContentViews {
    views: [Box<dyn SectionView>; 5],
}

impl Default for ContentViews {
    fn default() -> Self {
        Self {
            views: [
                Box::new(DashboardView),
                Box::new(PlaceholderView {
                    title: "Patients",
                    summary: "Complete patient records and history.",
                }),
                Box::new(PlaceholderView {
                    title: "Appointments",
                    summary: "Scheduling and appointment status.",
                }),
                Box::new(PlaceholderView {
                    title: "Billing",
                    summary: "Bills, due dates and payment status.",
                }),
                Box::new(PlaceholderView {
                    title: "AI Documentation",
                    summary: "AI-assisted clinical notes for completed appointments.",
                }),
            ],
        }
    }
}

impl ContentViews {
    fn slot(section: Section) -> usize {
        match section {
            Section::Dashboard => 0,
            Section::Patients => 1,
            Section::Appointments => 2,
            Section::Billing => 3,
            Section::AiDocs => 4,
        }
    }

    /// Replaces the view for one section.
    pub fn with_view(mut self, section: Section, view: Box<dyn SectionView>) -> Self {
        self.views[Self::slot(section)] = view;
        self
    }

    pub fn get(&self, section: Section) -> &dyn SectionView {
        self.views[Self::slot(section)].as_ref()
    }
}

/// render_text
///
/// Plain-text rendering of a screen, used by the terminal shell.
pub fn render_text(screen: &Screen, views: &ContentViews) -> String {
    match screen {
        Screen::Loading => format!("{LOADING_MESSAGE}\n"),
        Screen::Entry => concat!(
            "MedCare HMS | Welcome Back\n",
            "Sign in to access your hospital dashboard.\n",
            "  login <email> <password>\n",
            "  demo <admin|doctor|nurse|patient>\n",
            "  register <role> <email> <password> <full name...>\n",
        )
        .to_string(),
        Screen::Shell(shell) => render_shell(shell, views),
    }
}

fn render_shell(shell: &ShellView, views: &ContentViews) -> String {
    let identity = &shell.identity;
    let mut out = String::new();

    let _ = writeln!(out, "MedCare HMS | Hospital Management");
    let _ = writeln!(
        out,
        "[{}] {} ({}, {} badge)",
        identity.role.avatar(),
        identity.full_name,
        identity.role,
        identity.role.badge_color()
    );
    let _ = writeln!(out);

    for item in &shell.menu {
        let marker = if item.active { '>' } else { ' ' };
        let _ = writeln!(
            out,
            "{marker} {:<18} [{}]",
            item.entry.label,
            item.entry.section.id()
        );
    }

    let view = views.get(shell.content);
    let _ = writeln!(out);
    let _ = writeln!(out, "== {} ==", view.title());
    let _ = writeln!(out, "{}", view.render(identity));
    out
}
