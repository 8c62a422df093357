use std::fmt::Write;

use anyhow::{Result, bail};

use crate::ast::Constant;

/// A constant ready to be rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstDef {
    /// Variant name, the header name without its enum prefix.
    pub variant: String,
    /// Name as declared in the header.
    pub c_name: String,
    pub code: i64,
    pub message: String,
}

/// Drop ignored constants, strip `prefix`, and sort by code.
pub fn convert(constants: &[Constant], prefix: &str, ignored: &[&str]) -> Result<Vec<ConstDef>> {
    let mut defs = Vec::with_capacity(constants.len());
    for constant in constants {
        if ignored.contains(&constant.name.as_str()) {
            continue;
        }
        let variant = constant.name.strip_prefix(prefix).unwrap_or(&constant.name);
        if variant.is_empty() || variant == "Unknown" {
            bail!("{} cannot be used as a variant name", constant.name);
        }
        defs.push(ConstDef {
            variant: variant.to_owned(),
            c_name: constant.name.clone(),
            code: constant.value,
            message: delimit(variant),
        });
    }
    defs.sort_by_key(|def| def.code);
    if let Some(pair) = defs.windows(2).find(|pair| pair[0].code == pair[1].code) {
        bail!("{} and {} share code {}", pair[0].c_name, pair[1].c_name, pair[0].code);
    }
    Ok(defs)
}

/// Split a `CamelCase` name into lower-case words (`TouchIDLockout` → `touch id lockout`).
pub fn delimit(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if i > 0 && c.is_uppercase() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_uppercase() && next_is_lower)
            {
                out.push(' ');
            }
        }
        out.extend(c.to_lowercase());
    }
    out
}

/// Render the catalog module.
pub fn render(
    header: &str,
    errors: &[ConstDef],
    policies: &[ConstDef],
) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    writeln!(out, "// @generated by touchkit-gen from <{header}>. Do not edit.")?;
    writeln!(out)?;
    writeln!(out, "use crate::Entry;")?;
    writeln!(out)?;

    writeln!(out, "/// A failure reported by the platform authentication service.")?;
    writeln!(out, "#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]")?;
    writeln!(out, "pub enum ErrorKind {{")?;
    for def in errors {
        writeln!(out, "    /// `{}` ({}).", def.c_name, def.code)?;
        writeln!(out, "    #[error(\"{}\")]", def.message)?;
        writeln!(out, "    {},", def.variant)?;
    }
    writeln!(out, "    /// A code with no catalog entry.")?;
    writeln!(out, "    #[error(\"unknown code {{0}}\")]")?;
    writeln!(out, "    Unknown(i64),")?;
    writeln!(out, "}}")?;
    writeln!(out)?;
    writeln!(out, "impl ErrorKind {{")?;
    writeln!(out, "    /// The platform's numeric code for this error.")?;
    writeln!(out, "    #[must_use]")?;
    writeln!(out, "    pub const fn code(&self) -> i64 {{")?;
    writeln!(out, "        match self {{")?;
    for def in errors {
        writeln!(out, "            Self::{} => {},", def.variant, def.code)?;
    }
    writeln!(out, "            Self::Unknown(code) => *code,")?;
    writeln!(out, "        }}")?;
    writeln!(out, "    }}")?;
    writeln!(out, "}}")?;
    writeln!(out)?;
    render_table(&mut out, "error", "ERRORS", "ErrorKind", errors)?;
    writeln!(out)?;

    writeln!(out, "/// A class of proof the platform accepts for one evaluation.")?;
    writeln!(out, "#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]")?;
    writeln!(out, "pub enum Policy {{")?;
    for def in policies {
        writeln!(out, "    /// `{}` ({}).", def.c_name, def.code)?;
        writeln!(out, "    {},", def.variant)?;
    }
    writeln!(out, "}}")?;
    writeln!(out)?;
    writeln!(out, "impl Policy {{")?;
    writeln!(out, "    /// The platform's numeric code for this policy.")?;
    writeln!(out, "    #[must_use]")?;
    writeln!(out, "    pub const fn code(self) -> i64 {{")?;
    writeln!(out, "        match self {{")?;
    for def in policies {
        writeln!(out, "            Self::{} => {},", def.variant, def.code)?;
    }
    writeln!(out, "        }}")?;
    writeln!(out, "    }}")?;
    writeln!(out)?;
    writeln!(out, "    /// The catalog row for this policy.")?;
    writeln!(out, "    pub(crate) fn entry(self) -> &'static Entry<Self> {{")?;
    writeln!(out, "        match self {{")?;
    for (index, def) in policies.iter().enumerate() {
        writeln!(out, "            Self::{} => &POLICIES[{index}],", def.variant)?;
    }
    writeln!(out, "        }}")?;
    writeln!(out, "    }}")?;
    writeln!(out, "}}")?;
    writeln!(out)?;
    render_table(&mut out, "policy", "POLICIES", "Policy", policies)?;
    Ok(out)
}

fn render_table(
    out: &mut String,
    noun: &str,
    table: &str,
    ty: &str,
    defs: &[ConstDef],
) -> std::fmt::Result {
    writeln!(out, "/// Every cataloged {noun}, sorted by code.")?;
    writeln!(out, "pub const {table}: &[Entry<{ty}>] = &[")?;
    for def in defs {
        writeln!(
            out,
            "    Entry::new({ty}::{}, \"{}\", {}, \"{}\"),",
            def.variant, def.variant, def.code, def.message
        )?;
    }
    writeln!(out, "];")
}
