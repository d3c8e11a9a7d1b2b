// src/checker/form.rs
// =============================================================================
// Decides whether a <form> collects credentials.
//
// Two independent signals:
// 1. Naming: action, id or class mentions "login" or "signin"
// 2. Fields: a password input plus a username-ish or email-ish input
//    (a text/email input whose name or id contains "user" or "email")
//
// A form is a login form if either signal fires.
// =============================================================================

use scraper::node::Element;
use scraper::ElementRef;

use crate::models::FormInfo;

// What the descendant <input> elements of one form told us
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct InputSignals {
    count: usize,
    has_password: bool,
    has_username: bool,
    has_email: bool,
}

impl InputSignals {
    fn observe(&mut self, input: &Element) {
        self.count += 1;

        let lower = |name: &str| input.attr(name).unwrap_or_default().to_lowercase();
        let input_type = lower("type");
        let name = lower("name");
        let id = lower("id");

        if input_type == "password" {
            self.has_password = true;
        }

        if input_type == "text" || input_type == "email" {
            let identifies_user = [&name, &id]
                .iter()
                .any(|value| value.contains("user") || value.contains("email"));
            if identifies_user {
                if input_type == "email" {
                    self.has_email = true;
                } else {
                    self.has_username = true;
                }
            }
        }
    }

    fn looks_like_credentials(&self) -> bool {
        self.has_password && (self.has_username || self.has_email)
    }
}

// Builds the FormInfo for one <form> element
//
// Every <input> below the form counts, however deeply it is nested.
pub fn analyze_form(form: ElementRef<'_>) -> FormInfo {
    let element = form.value();

    let named_login = ["action", "id", "class"]
        .iter()
        .filter_map(|attr| element.attr(attr))
        .any(mentions_login);

    let mut signals = InputSignals::default();
    for node in form.descendants() {
        if let Some(input) = ElementRef::wrap(node) {
            if input.value().name() == "input" {
                signals.observe(input.value());
            }
        }
    }

    FormInfo {
        action: element.attr("action").unwrap_or_default().to_string(),
        method: element.attr("method").unwrap_or_default().to_uppercase(),
        has_login: named_login || signals.looks_like_credentials(),
        input_count: signals.count,
    }
}

fn mentions_login(value: &str) -> bool {
    let value = value.to_lowercase();
    value.contains("login") || value.contains("signin")
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    fn first_form(html: &str) -> FormInfo {
        let document = Html::parse_document(html);
        let selector = Selector::parse("form").unwrap();
        let form = document.select(&selector).next().unwrap();
        analyze_form(form)
    }

    #[test]
    fn test_password_and_username_is_login() {
        let info = first_form(
            r#"<form method="post">
                <input type="text" name="username">
                <input type="password" name="password">
            </form>"#,
        );
        assert!(info.has_login);
        assert_eq!(info.method, "POST");
        assert_eq!(info.input_count, 2);
    }

    #[test]
    fn test_password_and_email_is_login() {
        let info = first_form(
            r#"<form><input type="email" id="EmailAddress"><input type="password"></form>"#,
        );
        assert!(info.has_login);
    }

    #[test]
    fn test_search_form_is_not_login() {
        let info = first_form(r#"<form action="/search"><input type="text" name="search"></form>"#);
        assert!(!info.has_login);
        assert_eq!(info.action, "/search");
        assert_eq!(info.input_count, 1);
    }

    #[test]
    fn test_password_alone_is_not_login() {
        let info = first_form(r#"<form><input type="password" name="pin"></form>"#);
        assert!(!info.has_login);
    }

    #[test]
    fn test_naming_signal_in_class() {
        let info = first_form(r#"<form class="SignIn-box"><input type="text" name="q"></form>"#);
        assert!(info.has_login);
    }

    #[test]
    fn test_nested_inputs_are_counted() {
        let info = first_form(
            r#"<form action="/auth/Login">
                <div><fieldset><input type="text" name="user_id"></fieldset></div>
                <p><input type="submit"></p>
            </form>"#,
        );
        assert!(info.has_login);
        assert_eq!(info.input_count, 2);
        assert_eq!(info.method, "");
    }
}
