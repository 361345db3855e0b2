use routewire_parse_utils::LocatedParsingError;
use routewire_parse_utils::Span;
use routewire_serde_macros::LocatedError;

use nom::error::FromExternalError;

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct UndefinedCode(pub u8);

#[derive(LocatedError, Eq, PartialEq, Debug, Clone)]
pub enum TestError {
    NomError(#[from_nom] nom::error::ErrorKind),
    UndefinedCode(#[from_external] UndefinedCode),
}

fn main() {
    let span = Span::new(&[0xff]);
    let located = LocatedTestError::from_external_error(
        span,
        nom::error::ErrorKind::MapRes,
        UndefinedCode(0xff),
    );
    assert_eq!(located.span(), &span);
    assert_eq!(located.error(), &TestError::UndefinedCode(UndefinedCode(0xff)));
}
