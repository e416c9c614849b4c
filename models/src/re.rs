use regex::Regex;

lazy_static::lazy_static! {
    pub static ref DICE_SPEC_REGEX: Regex = Regex::new(r"^\s*(\d*)\s*[dD]\s*(\d+)\s*$").unwrap();
    pub static ref FLAT_DICE_REGEX: Regex = Regex::new(r"^\s*(\d+)\s*$").unwrap();
}
