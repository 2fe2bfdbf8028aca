mod details;
pub(super) mod form;
pub(super) mod modal;
mod panels;
