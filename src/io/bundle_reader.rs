use super::{InstanceReader, WarningHandler};
use crate::aba::{BabaError, BipolarABAFramework, Literal, LiteralKind, Rule, RuleKind};
use anyhow::{anyhow, Context, Result};
use std::{
    collections::{HashMap, HashSet},
    io::{BufRead, BufReader, Read},
};

/// A reader for the line-based bundle format describing bipolar ABA frameworks.
///
/// The first non-comment line is the preamble `p baba`.
/// Each other line begins with a tag:
///   * `a <key> [payload]` declares an assumption, with an optional free text payload;
///   * `f <key> [payload]` declares a fact, which takes part in the framework like an assumption;
///   * `c <key> <contrary>` gives the contrary of an assumption;
///   * `s <head> <body>` is a support rule, in which the head is an assumption;
///   * `x <contrary> <body>` is an attack rule, in which the head is a contrary.
///
/// Lines beginning with `#` and empty lines are ignored.
/// Declaring a literal twice or repeating a line raises a warning; the first declaration is kept.
///
/// ```text
/// p baba
/// # b attacks a, which supports c
/// a a Alice is at home
/// a b
/// f c
/// c a not_a
/// c b not_b
/// c c not_c
/// x not_a b
/// s c a
/// ```
#[derive(Default)]
pub struct BundleReader {
    warning_handlers: Vec<WarningHandler>,
}

#[derive(Default)]
struct BundleContent {
    literals: Vec<Literal>,
    literal_indices: HashMap<String, usize>,
    contraries: Vec<(String, String)>,
    rules: Vec<(RuleKind, String, String, usize)>,
    seen_lines: HashSet<Vec<String>>,
}

impl BundleContent {
    fn literal(&self, key: &str) -> Literal {
        self.literal_indices
            .get(key)
            .map(|i| self.literals[*i].clone())
            .unwrap_or_else(|| Literal::assumption(key))
    }

    fn build(self) -> Result<BipolarABAFramework> {
        let contraries = self
            .contraries
            .iter()
            .map(|(k, c)| (self.literal(k), self.literal(c)))
            .collect::<Vec<_>>();
        let rules = self
            .rules
            .iter()
            .map(|(_, h, b, _)| Rule::new(self.literal(h), self.literal(b)))
            .collect::<Vec<_>>();
        let framework = BipolarABAFramework::new(self.literals, contraries, rules)
            .context("while building the framework")?;
        for (tag, head, _, line) in self.rules.iter() {
            match framework.rule_kind_for_head(head) {
                Some(k) if k == *tag => {}
                _ => {
                    return Err(BabaError::validation(
                        format!("the head of this {} rule has the wrong kind", tag.as_ref()),
                        [head.as_str()],
                    ))
                    .with_context(|| format!("while checking line with index {}", line))
                }
            }
        }
        Ok(framework)
    }
}

impl InstanceReader for BundleReader {
    fn read(&self, reader: &mut dyn Read) -> Result<BipolarABAFramework> {
        let br = BufReader::new(reader);
        let mut found_preamble = false;
        let mut content = BundleContent::default();
        for (i, line) in br.lines().enumerate() {
            let context = || format!("while reading line with index {}", i);
            let warn = |w: String| {
                self.warning_handlers
                    .iter()
                    .for_each(|h| (h)(1 + i, w.clone()))
            };
            let l = line.with_context(context)?;
            let trimmed = l.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let words = trimmed.split_whitespace().collect::<Vec<&str>>();
            if !found_preamble {
                read_preamble(&words).with_context(context)?;
                found_preamble = true;
                continue;
            }
            let expect_n_words = |first, expected| {
                if expected != words.len() {
                    Err(anyhow!(
                        r#"wrong number of words for a "{first}" line; expected {expected}, got {}"#,
                        words.len()
                    ))
                    .with_context(context)
                } else {
                    Ok(())
                }
            };
            if !content
                .seen_lines
                .insert(words.iter().map(|w| w.to_string()).collect())
            {
                warn("duplicated line".to_string());
                continue;
            }
            match words[0] {
                "a" | "f" => {
                    if words.len() < 2 {
                        return Err(anyhow!(
                            r#"wrong number of words for a "{}" line; expected at least 2, got {}"#,
                            words[0],
                            words.len()
                        ))
                        .with_context(context);
                    }
                    if content.literal_indices.contains_key(words[1]) {
                        warn(format!(
                            r#"literal "{}" is declared more than once; the first declaration is kept"#,
                            words[1]
                        ));
                        continue;
                    }
                    let kind = if words[0] == "a" {
                        LiteralKind::Assumption
                    } else {
                        LiteralKind::Fact
                    };
                    let mut literal = Literal::new(words[1], kind);
                    if words.len() > 2 {
                        literal = literal.with_payload(words[2..].join(" "));
                    }
                    content
                        .literal_indices
                        .insert(words[1].to_string(), content.literals.len());
                    content.literals.push(literal);
                }
                "c" => {
                    expect_n_words("c", 3)?;
                    content
                        .contraries
                        .push((words[1].to_string(), words[2].to_string()));
                }
                "s" | "x" => {
                    expect_n_words(words[0], 3)?;
                    let tag = if words[0] == "s" {
                        RuleKind::Support
                    } else {
                        RuleKind::Attack
                    };
                    content
                        .rules
                        .push((tag, words[1].to_string(), words[2].to_string(), i));
                }
                _ => {
                    return Err(anyhow!(r#"unexpected first word "{}""#, words[0]))
                        .with_context(context)
                }
            }
        }
        if !found_preamble {
            return Err(anyhow!("missing preamble"));
        }
        content.build()
    }

    fn add_warning_handler(&mut self, h: WarningHandler) {
        self.warning_handlers.push(h);
    }
}

fn read_preamble(words: &[&str]) -> Result<()> {
    if words.len() != 2 {
        return Err(anyhow!(
            r#"error in preamble; expected 2 words, got {}"#,
            words.len()
        ));
    }
    if words[0] != "p" {
        return Err(anyhow!(
            r#"error in first word of preamble; expected "p", got "{}""#,
            words[0]
        ));
    }
    if words[1] != "baba" {
        return Err(anyhow!(
            r#"error in second word of preamble; expected "baba", got "{}""#,
            words[1]
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{cell::RefCell, rc::Rc};

    const BUNDLE: &str = r#"p baba
    # b attacks a, which supports c
    a a Alice is at home
    a b
    f c
    c a not_a
    c b not_b
    c c not_c
    x not_a b
    s c a
    "#;

    #[test]
    fn test_read_ok() {
        let fw = BundleReader::default()
            .read(&mut BUNDLE.as_bytes())
            .unwrap();
        assert_eq!(
            vec!["a", "b", "c"],
            fw.iter_assumptions().map(|a| a.key()).collect::<Vec<_>>()
        );
        assert_eq!(
            vec!["c"],
            fw.iter_facts().map(|a| a.key()).collect::<Vec<_>>()
        );
        assert_eq!(Some("Alice is at home"), fw.assumption(0).payload());
        assert_eq!(2, fw.n_rules());
        assert_eq!(1, fw.n_attack_rules());
        assert!(fw.is_contrary("not_b"));
    }

    #[test]
    fn test_missing_preamble() {
        assert!(BundleReader::default()
            .read(&mut "a a\nc a not_a\n".as_bytes())
            .is_err());
        assert!(BundleReader::default().read(&mut "".as_bytes()).is_err());
    }

    #[test]
    fn test_wrong_preamble() {
        for p in ["p aba\n", "p baba 3\n", "q baba\n"] {
            assert!(BundleReader::default().read(&mut p.as_bytes()).is_err());
        }
    }

    #[test]
    fn test_empty_framework() {
        let fw = BundleReader::default()
            .read(&mut "p baba\n".as_bytes())
            .unwrap();
        assert_eq!(0, fw.n_assumptions());
    }

    #[test]
    fn test_unexpected_first_word() {
        assert!(BundleReader::default()
            .read(&mut "p baba\nr a b\n".as_bytes())
            .is_err());
    }

    #[test]
    fn test_wrong_number_of_words() {
        for l in ["a", "c a", "c a not_a b", "s a", "x not_a b c"] {
            let instance = format!("p baba\na a\nc a not_a\n{}\n", l);
            assert!(BundleReader::default()
                .read(&mut instance.as_bytes())
                .is_err());
        }
    }

    #[test]
    fn test_rule_tag_mismatch() {
        let instance = "p baba\na a\na b\nc a not_a\nc b not_b\ns not_a b\n";
        let err = BundleReader::default()
            .read(&mut instance.as_bytes())
            .unwrap_err();
        assert_eq!(
            vec!["not_a"],
            err.downcast_ref::<BabaError>().unwrap().keys()
        );
        let instance = "p baba\na a\na b\nc a not_a\nc b not_b\nx a b\n";
        assert!(BundleReader::default()
            .read(&mut instance.as_bytes())
            .is_err());
    }

    #[test]
    fn test_validation_error() {
        let instance = "p baba\na a\na b\nc a not_a\n";
        let err = BundleReader::default()
            .read(&mut instance.as_bytes())
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<BabaError>(),
            Some(BabaError::Validation { .. })
        ));
    }

    #[test]
    fn test_warnings() {
        let instance = "p baba\na a\nf a\na b\nc a not_a\nc b not_b\nc b not_b\n";
        let warnings = Rc::new(RefCell::new(vec![]));
        let warnings_clone = Rc::clone(&warnings);
        let closure = Box::new(move |i: usize, w: String| warnings_clone.borrow_mut().push((i, w)));
        let mut reader = BundleReader::default();
        reader.add_warning_handler(closure);
        let fw = reader.read(&mut instance.as_bytes()).unwrap();
        assert_eq!(0, fw.iter_facts().count());
        assert_eq!(
            warnings.borrow().clone(),
            vec![
                (
                    3,
                    r#"literal "a" is declared more than once; the first declaration is kept"#
                        .to_string()
                ),
                (7, "duplicated line".to_string()),
            ]
        );
    }
}
