use crate::console::Console;

#[derive(Clone)]
pub struct AppState {
    pub console: Console,
}

impl AppState {
    pub fn new(console: Console) -> Self {
        Self { console }
    }
}
