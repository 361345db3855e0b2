use routewire_serde_macros::WritingError;

#[derive(WritingError, Eq, PartialEq, Debug, Clone)]
pub enum InnerWritingError {
    StdIOError(#[from_std_io_error] String),
}

#[derive(WritingError, Eq, PartialEq, Debug, Clone)]
pub enum OuterWritingError {
    StdIOError(#[from_std_io_error] String),
    InnerError(#[from] InnerWritingError),
}

fn main() {
    let io_err = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "eof");
    let inner = InnerWritingError::from(io_err);
    let InnerWritingError::StdIOError(msg) = &inner;
    assert!(msg.contains("eof"));
    let outer = OuterWritingError::from(inner.clone());
    assert_eq!(outer, OuterWritingError::InnerError(inner));
}
