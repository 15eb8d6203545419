//! Login-form detection state machine.
//!
//! Watches the token stream for the combination of a form, a password
//! field, a text/email field, and a submit control. The determination is
//! monotonic: once the page is classified as a login page the detector
//! goes inert.

use crate::report::{PageSnapshot, ScanState};
use crate::token::Token;

/// Button captions that count as a submit control.
const SUBMIT_KEYWORDS: [&str; 6] = ["login", "log in", "sign in", "signin", "submit", "access"];

/// Evidence collected so far, reset only at scan start.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginFlags {
    pub saw_form: bool,
    pub saw_password_field: bool,
    pub saw_text_field: bool,
    pub saw_submit_control: bool,
    pub inside_form: bool,
    pub inside_submit_button: bool,
}

/// The detector itself; one per scan.
#[derive(Debug, Default)]
pub struct LoginDetector {
    flags: LoginFlags,
}

impl LoginDetector {
    /// Feed one token; returns a snapshot when the page is first
    /// classified as a login page.
    pub fn observe(&mut self, token: &Token, state: &ScanState) -> Option<PageSnapshot> {
        // Evaluated before acting on the token: a satisfied detector must
        // not re-emit.
        if state.is_login() {
            return None;
        }

        match token {
            Token::StartTag(tag) | Token::SelfClosingTag(tag) => match tag.name.as_str() {
                "form" => {
                    self.flags.saw_form = true;
                    self.flags.inside_form = true;
                }
                "input" => match tag.attr("type") {
                    Some("password") => self.flags.saw_password_field = true,
                    Some("email" | "text") => self.flags.saw_text_field = true,
                    Some("submit") => self.flags.saw_submit_control = true,
                    _ => {}
                },
                "button" => {
                    if tag.attr("type") == Some("submit") {
                        self.flags.inside_submit_button = true;
                    }
                }
                _ => {}
            },
            Token::EndTag(tag) if tag.name == "button" => {
                if self.flags.inside_form && self.flags.inside_submit_button {
                    self.flags.inside_submit_button = false;
                }
            }
            Token::Text(text) => {
                if self.flags.inside_form && self.flags.inside_submit_button {
                    let caption = normalize(text);
                    if SUBMIT_KEYWORDS
                        .iter()
                        .any(|keyword| normalize(keyword) == caption)
                    {
                        self.flags.saw_submit_control = true;
                    }
                }
            }
            _ => {}
        }

        if self.flags.saw_form
            && self.flags.saw_password_field
            && self.flags.saw_text_field
            && self.flags.saw_submit_control
        {
            state.with_core(|core| core.is_login = true);
            return Some(state.snapshot());
        }
        None
    }

    /// Current evidence, for tests.
    #[must_use]
    pub fn flags(&self) -> &LoginFlags {
        &self.flags
    }
}

/// Lowercase with all whitespace stripped, so `Log In` matches `login`.
fn normalize(text: &str) -> String {
    text.split_whitespace().collect::<String>().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::Tag;

    fn start(name: &str) -> Token {
        Token::StartTag(Tag::new(name, vec![]))
    }

    fn end(name: &str) -> Token {
        Token::EndTag(Tag::new(name, vec![]))
    }

    fn input(kind: &str) -> Token {
        Token::SelfClosingTag(Tag::new(
            "input",
            vec![("type".to_string(), kind.to_string())],
        ))
    }

    fn run(detector: &mut LoginDetector, state: &ScanState, tokens: &[Token]) {
        for token in tokens {
            detector.observe(token, state);
        }
    }

    #[test]
    fn test_full_login_form_detected() {
        let state = ScanState::default();
        let mut detector = LoginDetector::default();

        run(
            &mut detector,
            &state,
            &[
                start("form"),
                input("text"),
                input("password"),
                input("submit"),
                end("form"),
            ],
        );

        assert!(state.is_login());
        assert_eq!(
            detector.flags(),
            &LoginFlags {
                saw_form: true,
                saw_password_field: true,
                saw_text_field: true,
                saw_submit_control: true,
                inside_form: true,
                inside_submit_button: false,
            }
        );
    }

    #[test]
    fn test_missing_password_is_not_login() {
        let state = ScanState::default();
        let mut detector = LoginDetector::default();

        run(
            &mut detector,
            &state,
            &[start("form"), input("text"), input("submit"), end("form")],
        );

        assert!(!state.is_login());
        assert!(!detector.flags().saw_password_field);
    }

    #[test]
    fn test_email_field_counts_as_text() {
        let state = ScanState::default();
        let mut detector = LoginDetector::default();

        run(
            &mut detector,
            &state,
            &[start("form"), input("email"), input("password"), input("submit")],
        );

        assert!(state.is_login());
    }

    #[test]
    fn test_submit_button_caption() {
        let state = ScanState::default();
        let mut detector = LoginDetector::default();

        run(
            &mut detector,
            &state,
            &[
                start("form"),
                Token::StartTag(Tag::new(
                    "button",
                    vec![("type".to_string(), "submit".to_string())],
                )),
                Token::Text("Log In".to_string()),
                end("button"),
                end("form"),
            ],
        );

        let flags = detector.flags();
        assert!(flags.saw_submit_control);
        assert!(!flags.inside_submit_button);
        // Caption alone is not enough evidence.
        assert!(!state.is_login());
    }

    #[test]
    fn test_button_caption_outside_button_ignored() {
        let state = ScanState::default();
        let mut detector = LoginDetector::default();

        run(
            &mut detector,
            &state,
            &[start("form"), Token::Text("login".to_string())],
        );

        assert!(!detector.flags().saw_submit_control);
    }

    #[test]
    fn test_unrelated_tokens_leave_flags_untouched() {
        let state = ScanState::default();
        let mut detector = LoginDetector::default();

        run(
            &mut detector,
            &state,
            &[start("h1"), Token::Text("Header".to_string()), end("h1")],
        );

        assert_eq!(detector.flags(), &LoginFlags::default());
        assert!(!state.is_login());
    }

    #[test]
    fn test_detector_inert_once_satisfied() {
        let state = ScanState::default();
        let mut detector = LoginDetector::default();

        let snapshot = run_to_login(&mut detector, &state);
        assert!(snapshot);

        // Further tokens must not mutate flags or re-emit.
        assert!(detector.observe(&start("form"), &state).is_none());
    }

    fn run_to_login(detector: &mut LoginDetector, state: &ScanState) -> bool {
        let tokens = [
            start("form"),
            input("text"),
            input("password"),
            input("submit"),
        ];
        let mut emitted = false;
        for token in &tokens {
            emitted |= detector.observe(token, state).is_some();
        }
        emitted
    }

    #[test]
    fn test_only_first_type_attribute_consulted() {
        let state = ScanState::default();
        let mut detector = LoginDetector::default();

        detector.observe(&start("form"), &state);
        detector.observe(
            &Token::SelfClosingTag(Tag::new(
                "input",
                vec![
                    ("type".to_string(), "hidden".to_string()),
                    ("type".to_string(), "password".to_string()),
                ],
            )),
            &state,
        );

        assert!(!detector.flags().saw_password_field);
    }
}
