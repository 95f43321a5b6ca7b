//! `{field}` substitution for driver configuration templates. `{{` and `}}`
//! produce literal braces.

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    #[error("line {line}: unknown template field '{name}'")]
    UnknownField { line: usize, name: String },
    #[error("line {line}: unterminated '{{'")]
    Unterminated { line: usize },
    #[error("line {line}: single '}}' outside a field")]
    StrayClose { line: usize },
}

pub fn render<'a, F>(template: &str, lookup: F) -> Result<String, TemplateError>
where
    F: Fn(&str) -> Option<&'a str>,
{
    let mut out = String::with_capacity(template.len());
    let mut line = 1;
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\n' => {
                line += 1;
                out.push(c);
            }
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                out.push('{');
            }
            '{' => {
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some('\n') | None => return Err(TemplateError::Unterminated { line }),
                        Some(ch) => name.push(ch),
                    }
                }
                let value = lookup(&name).ok_or(TemplateError::UnknownField { line, name })?;
                out.push_str(value);
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                out.push('}');
            }
            '}' => return Err(TemplateError::StrayClose { line }),
            _ => out.push(c),
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(name: &str) -> Option<&'static str> {
        match name {
            "hostname" => Some("db2host"),
            "port" => Some("50000"),
            "schema" => Some("G2"),
            _ => None,
        }
    }

    #[test]
    fn substitutes_fields_and_escapes() {
        let out = render(
            "<dsn alias=\"{schema}\" host=\"{hostname}\" port=\"{port}\"/>\n{{literal}}\n",
            fields,
        )
        .unwrap();
        assert_eq!(
            out,
            "<dsn alias=\"G2\" host=\"db2host\" port=\"50000\"/>\n{literal}\n"
        );
    }

    #[test]
    fn reports_problems_with_line() {
        assert_eq!(
            render("ok\n{nope}", fields),
            Err(TemplateError::UnknownField {
                line: 2,
                name: "nope".into()
            })
        );
        assert_eq!(
            render("{schema", fields),
            Err(TemplateError::Unterminated { line: 1 })
        );
        assert_eq!(
            render("a\nb}", fields),
            Err(TemplateError::StrayClose { line: 2 })
        );
    }
}
