/// Static display names for the enums shown to the operator
pub trait AsStr {
    fn as_str(&self) -> &'static str;
}
