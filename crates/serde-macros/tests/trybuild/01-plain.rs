use routewire_parse_utils::LocatedParsingError;
use routewire_parse_utils::Span;
use routewire_serde_macros::LocatedError;

#[derive(LocatedError, Eq, PartialEq, Debug, Clone)]
pub enum TestError {
    A,
    B,
}

fn main() {
    let span = Span::new(&[]);
    let error = TestError::A;
    let located = LocatedTestError::new(span, error.clone());
    assert_eq!(located.span(), &span);
    assert_eq!(located.error(), &error);
}
