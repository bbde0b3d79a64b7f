mod controls;
mod details;
mod home;
mod metrics;
mod panels;

pub(super) use self::panels::draw_loading;
