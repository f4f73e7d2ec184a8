use std::{fmt, str::FromStr};

use crate::{
    models::{Identity, Role},
    session::SessionStatus,
};

// --- Sections & Menu ---

/// Section
///
/// The fixed set of content areas inside the authenticated shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Section {
    #[default]
    Dashboard,
    Patients,
    Appointments,
    Billing,
    AiDocs,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::Dashboard,
        Section::Patients,
        Section::Appointments,
        Section::Billing,
        Section::AiDocs,
    ];

    /// Stable identifier, as used in navigation events.
    pub fn id(&self) -> &'static str {
        match self {
            Section::Dashboard => "dashboard",
            Section::Patients => "patients",
            Section::Appointments => "appointments",
            Section::Billing => "billing",
            Section::AiDocs => "ai-docs",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Section {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Section::ALL
            .into_iter()
            .find(|section| section.id() == s.trim())
            .ok_or_else(|| format!("unknown section '{}'", s.trim()))
    }
}

/// Icon
///
/// Icon references for the navigation menu; the front-end decides how to draw them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    LayoutDashboard,
    Users,
    Calendar,
    FileText,
    Brain,
}

/// MenuEntry
///
/// A declarative, role-scoped navigation item. This table is the only place in
/// the crate where a role is compared against a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuEntry {
    pub section: Section,
    pub label: &'static str,
    pub icon: Icon,
    pub roles: &'static [Role],
}

impl MenuEntry {
    pub fn permits(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

/// The full navigation menu, in display order. Never mutated at runtime.
pub static MENU: [MenuEntry; 5] = [
    MenuEntry {
        section: Section::Dashboard,
        label: "Dashboard",
        icon: Icon::LayoutDashboard,
        roles: &[Role::Admin, Role::Doctor, Role::Nurse, Role::Patient],
    },
    MenuEntry {
        section: Section::Patients,
        label: "Patients",
        icon: Icon::Users,
        roles: &[Role::Admin, Role::Doctor, Role::Nurse],
    },
    MenuEntry {
        section: Section::Appointments,
        label: "Appointments",
        icon: Icon::Calendar,
        roles: &[Role::Admin, Role::Doctor, Role::Nurse, Role::Patient],
    },
    MenuEntry {
        section: Section::Billing,
        label: "Billing",
        icon: Icon::FileText,
        roles: &[Role::Admin, Role::Doctor, Role::Patient],
    },
    MenuEntry {
        section: Section::AiDocs,
        label: "AI Documentation",
        icon: Icon::Brain,
        roles: &[Role::Doctor, Role::Nurse],
    },
];

/// filtered_menu
///
/// The menu entries visible to `role`, in declared order.
pub fn filtered_menu(role: Role) -> Vec<&'static MenuEntry> {
    MENU.iter().filter(|entry| entry.permits(role)).collect()
}

// --- Navigation ---

/// NavigationState
///
/// The active section of the authenticated shell. Writes are not validated
/// against the current role: `render()` alone decides what is actually shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NavigationState {
    active: Section,
}

impl NavigationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Section {
        self.active
    }

    pub fn set_active_section(&mut self, section: Section) {
        self.active = section;
    }

    /// Back to `dashboard`, as on every login/logout transition.
    pub fn reset(&mut self) {
        self.active = Section::Dashboard;
    }
}

// --- Rendering ---

/// Message shown while the persisted session is being verified.
pub const LOADING_MESSAGE: &str = "Loading Hospital Management System...";

/// MenuItem
///
/// One rendered navigation button.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuItem {
    pub entry: &'static MenuEntry,
    pub active: bool,
}

/// ShellView
///
/// The authenticated layout: profile, filtered menu and the content section.
/// `content` is always a member of `menu`.
#[derive(Debug, Clone, PartialEq)]
pub struct ShellView {
    pub identity: Identity,
    pub menu: Vec<MenuItem>,
    pub content: Section,
}

/// Screen
///
/// Everything the front-end can be asked to draw.
#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    Loading,
    Entry,
    Shell(ShellView),
}

/// render
///
/// Pure mapping from the session and navigation state to a screen. An active
/// section the role cannot see (stale state from an earlier session, or a
/// forged navigation event) renders the dashboard instead.
pub fn render(status: &SessionStatus, navigation: &NavigationState) -> Screen {
    let session = match status {
        SessionStatus::Checking => return Screen::Loading,
        SessionStatus::Unauthenticated => return Screen::Entry,
        SessionStatus::Authenticated(session) => session,
    };

    let identity = session.identity();
    let entries = filtered_menu(identity.role);

    let requested = navigation.active();
    let content = if entries.iter().any(|entry| entry.section == requested) {
        requested
    } else {
        tracing::debug!(
            requested = %requested,
            role = %identity.role,
            "Section not available to role; showing dashboard"
        );
        Section::Dashboard
    };

    let menu = entries
        .into_iter()
        .map(|entry| MenuItem {
            entry,
            active: entry.section == content,
        })
        .collect();

    Screen::Shell(ShellView {
        identity: identity.clone(),
        menu,
        content,
    })
}
