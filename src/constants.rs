use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

const MONTH: &str = "(Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Sept|Oct|Nov|Dec\
|January|February|March|April|May|June|July|August|September|October|November|December)";
const DAY: &str = r"(\d\d?)(?:,|th|st|nd|rd)?";

pub static MONTH_CODES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("Jan", "01"),
        ("Feb", "02"),
        ("Mar", "03"),
        ("Apr", "04"),
        ("May", "05"),
        ("Jun", "06"),
        ("Jul", "07"),
        ("Aug", "08"),
        ("Sep", "09"),
        ("Sept", "09"),
        ("Oct", "10"),
        ("Nov", "11"),
        ("Dec", "12"),
        ("January", "01"),
        ("February", "02"),
        ("March", "03"),
        ("April", "04"),
        ("June", "06"),
        ("July", "07"),
        ("August", "08"),
        ("September", "09"),
        ("October", "10"),
        ("November", "11"),
        ("December", "12"),
    ])
});

pub static MONTH_DAY_YEAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"{MONTH}  ?{DAY} (\d\d\d\d)")).expect("MONTH_DAY_YEAR regex")
});
pub static DAY_MONTH_YEAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"{DAY} {MONTH} (\d\d\d\d)")).expect("DAY_MONTH_YEAR regex")
});
pub static MONTH_DAY: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"{MONTH}  ?{DAY}")).expect("MONTH_DAY regex"));

pub static UNIX_SECONDS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{10}$").expect("UNIX_SECONDS regex"));
pub static UNIX_MILLIS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{13}$").expect("UNIX_MILLIS regex"));

// tried in order, the first format that consumes the whole value wins
pub const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%d %H:%M%:z",
    "%a %b %d %Y %H:%M:%S GMT%z",
];
pub const LOCAL_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%b %d, %Y %H:%M:%S",
    "%b %d, %Y %H:%M",
    "%b %d %Y %H:%M:%S",
    "%d %b %Y %H:%M:%S",
    "%d %b %Y %H:%M",
    "%a %b %d %Y %H:%M:%S",
];
pub const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%b %d, %Y",
    "%b %d %Y",
    "%d %b %Y",
    "%d %b, %Y",
    "%a %b %d %Y",
    "%a, %b %d, %Y",
];

// guards against entries whose selectors overlap and keep waking each other
pub const MAX_DELIVERY_ROUNDS: usize = 32;

// live handles a node may have and still be written to through libxml
pub const NODE_RC_GUARD: usize = 8;
