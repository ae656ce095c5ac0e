pub mod cache;
pub mod generators {
    pub mod gemini;
}
pub mod limiters {
    pub mod sliding_window;
}
pub mod uploaders {
    pub mod local_storage;
}
