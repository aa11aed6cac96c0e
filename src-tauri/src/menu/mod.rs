//! Shell integration menus: the dock transport menu and the taskbar thumbnail toolbar.

pub mod dock;
pub mod thumbar;
