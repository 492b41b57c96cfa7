pub mod dashboard;
pub mod loading;
pub mod menu;
pub mod narrative;
pub mod progress_bar;
pub mod question_view;
