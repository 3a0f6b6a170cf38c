use std::borrow::Cow;
use std::fs;

use super::{ConfigError, DomainMatcher, SiteRule, SiteRuleTable};

const STACKEXCHANGE: &str = r#"
# answers and comments
domain_regex: (stackoverflow|superuser)\.(com|net)
require: //body   # only full pages
attribute(title, 20): //span[@class='relativetime']
text: //span[@class='comment-date']
observe: //div[@id='comments']
observe: //div[@id='answers']
"#;

fn parse(file_name: &str, data: &str) -> Result<SiteRule, ConfigError> {
    SiteRule::parse_data(file_name, Cow::Owned(data.as_bytes().to_vec()))
}

#[test]
fn parse_rule_file() {
    let entry = parse("stackexchange.txt", STACKEXCHANGE).unwrap();

    assert_eq!(entry.name, "stackexchange");
    assert!(matches!(entry.domain, DomainMatcher::Pattern(_)));
    assert!(entry.domain.matches("stackoverflow.com"));
    assert!(entry.domain.matches("meta.superuser.com"));
    assert!(!entry.domain.matches("github.com"));
    assert_eq!(entry.require.as_deref(), Some("//body"));
    assert_eq!(entry.rules.len(), 2);
    assert_eq!(entry.rules[0].xpath, "//span[@class='relativetime']");
    assert_eq!(
        entry.rules[0].fix.as_ref().map(|fix| fix.describe()),
        Some("attribute(title, 20)".to_string())
    );
    assert!(entry.rules[1].fix.is_none());
    assert_eq!(entry.observe, vec!["//div[@id='comments']", "//div[@id='answers']"]);
    assert!(entry.css.is_none());
}

#[test]
fn empty_domain_matches_everything() {
    let data = "domain:\nattribute(datetime): //time[@datetime]\n";
    let entry = parse("00-global.txt", data).unwrap();

    assert!(entry.domain.matches("example.org"));
    assert!(entry.domain.matches(""));
    assert_eq!(
        entry.rules[0].fix.as_ref().map(|fix| fix.describe()),
        Some("attribute(datetime)".to_string())
    );
}

#[test]
fn css_keeps_hash() {
    let data = "domain: forum.example.org\n\
        css: #main time { color: red; }\n\
        css: .age { font-weight: bold; }\n";
    let entry = parse("forum.txt", data).unwrap();

    assert_eq!(
        entry.css.as_deref(),
        Some("#main time { color: red; }\n.age { font-weight: bold; }")
    );
}

#[test]
fn missing_domain() {
    let result = parse("broken.txt", "text: //span\n");
    assert!(matches!(result, Err(ConfigError::MissingDomain(name)) if name == "broken"));
}

#[test]
fn invalid_attribute_rule() {
    let result = parse("broken.txt", "domain: example.org\nattribute(title, many): //span\n");
    assert!(matches!(result, Err(ConfigError::Attribute(_))));

    let result = parse("broken.txt", "domain: example.org\nattribute(): //span\n");
    assert!(matches!(result, Err(ConfigError::Attribute(_))));

    let result = parse("broken.txt", "domain: example.org\nattribute(title) //span\n");
    assert!(matches!(result, Err(ConfigError::Attribute(_))));
}

#[test]
fn invalid_domain_pattern() {
    let result = parse("broken.txt", "domain_regex: (github\n");
    assert!(matches!(result, Err(ConfigError::Pattern(_))));
}

#[test]
fn unknown_lines_are_skipped() {
    let entry = parse("site.txt", "domain: example.org\nstrip: //div\ntext: //p\n").unwrap();
    assert_eq!(entry.rules.len(), 1);
}

#[test]
fn embedded_table() {
    let table = SiteRuleTable::parse(None);

    let names: Vec<&str> = table.entries().iter().map(|entry| entry.name.as_str()).collect();
    assert_eq!(names[0], "00-global");
    assert_eq!(names[1], "01-discourse");

    let github = table.get("github.com").unwrap();
    assert!(github.domain.matches("github.com"));
    assert_eq!(github.observe.len(), 2);

    let reddit = table.get("reddit.com").unwrap();
    assert!(reddit.rules.is_empty());
    assert!(reddit.css.as_deref().unwrap().contains("Last edited"));

    let discourse = table.get("01-discourse").unwrap();
    assert_eq!(
        discourse.require.as_deref(),
        Some("//meta[@name='discourse_theme_ids']")
    );
}

#[test]
fn user_directory_overrides() {
    let directory = std::env::temp_dir().join(format!("yyyymmdd-rules-{}", std::process::id()));
    fs::create_dir_all(&directory).unwrap();
    fs::write(
        directory.join("github.com.txt"),
        "domain: github.com\ntext: //span[@class='when']\n",
    )
    .unwrap();
    fs::write(directory.join("example.org.txt"), "domain: example.org\ntext: //p\n").unwrap();
    fs::write(directory.join("broken.txt"), "text: //p\n").unwrap();
    fs::write(directory.join("notes.md"), "domain: nothing\n").unwrap();

    let table = SiteRuleTable::parse(Some(&directory));
    fs::remove_dir_all(&directory).unwrap();

    let github = table.get("github.com").unwrap();
    assert_eq!(github.rules.len(), 1);
    assert!(github.rules[0].fix.is_none());
    assert!(github.observe.is_empty());

    assert!(table.get("example.org").is_some());
    assert!(table.get("broken").is_none());
    assert!(table.get("notes").is_none());
    assert_eq!(table.entries()[0].name, "00-global");
}
