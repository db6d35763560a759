pub mod board;
pub mod icons;
pub mod progress;

pub use board::{render_board, render_tasks, task_line};
pub use progress::{Spinner, with_spinner};
