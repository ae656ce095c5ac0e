#[derive(Debug)]
pub struct UploadedFileCreate {
    pub name: String,
    pub content: Vec<u8>,
}
