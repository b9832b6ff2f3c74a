// src/navigation.rs

use serde::Serialize;

use crate::session::AdminSession;

/// One entry of the admin sidebar.
#[derive(Debug, Clone, Copy)]
pub struct MenuItem {
    pub href: &'static str,
    pub icon: &'static str,
    pub label: &'static str,
    pub superadmin_only: bool,
}

const fn item(href: &'static str, icon: &'static str, label: &'static str) -> MenuItem {
    MenuItem {
        href,
        icon,
        label,
        superadmin_only: false,
    }
}

const fn elevated(href: &'static str, icon: &'static str, label: &'static str) -> MenuItem {
    MenuItem {
        href,
        icon,
        label,
        superadmin_only: true,
    }
}

pub const MENU: [MenuItem; 9] = [
    item("/admin", "home", "Dashboard"),
    item("/admin/students", "users", "Students"),
    item("/admin/subjects", "book-open", "Subjects"),
    item("/admin/batches", "graduation-cap", "Batches"),
    item("/admin/results", "file-text", "Results"),
    item("/admin/reports", "bar-chart", "Reports"),
    elevated("/admin/user-management", "users", "User Management"),
    elevated("/admin/system-status", "database", "System Status"),
    elevated("/admin/settings", "settings", "Settings"),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavEntry {
    pub href: &'static str,
    pub icon: &'static str,
    pub label: &'static str,
    pub active: bool,
}

/// Sidebar entries visible to `session`, with the entry matching `current_path` marked active.
pub fn visible_menu(session: &AdminSession, current_path: Option<&str>) -> Vec<NavEntry> {
    MENU.iter()
        .filter(|m| !m.superadmin_only || session.access.is_elevated())
        .map(|m| NavEntry {
            href: m.href,
            icon: m.icon,
            label: m.label,
            active: current_path == Some(m.href),
        })
        .collect()
}
