use crate::centers::CenterDirectory;

pub struct AppState {
    pub directory: CenterDirectory,
}
