use std::collections::HashMap;
use std::io::Write;
use std::process::{Command, Stdio};

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use serde_json::Value;

/// The subset of clang's JSON AST this tool reads.
#[derive(Debug, Default, Deserialize)]
pub struct AstNode {
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub name: String,
    /// A string for integer literals, but a bool or number for other literal kinds.
    #[serde(default)]
    pub value: Option<Value>,
    #[serde(default)]
    pub inner: Vec<AstNode>,
}

/// One enumerator with its resolved value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constant {
    pub name: String,
    pub value: i64,
}

impl AstNode {
    fn is_enum_definition(&self) -> bool {
        // Forward declarations carry no enumerators.
        self.kind == "EnumDecl" && self.inner.iter().any(|child| child.kind == "EnumConstantDecl")
    }

    fn first_value(&self) -> Option<&str> {
        self.value
            .as_ref()
            .and_then(Value::as_str)
            .or_else(|| self.inner.iter().find_map(Self::first_value))
    }

    fn constants(&self) -> Result<Vec<Constant>> {
        let mut next = 0;
        let mut constants = Vec::new();
        for child in &self.inner {
            if child.kind != "EnumConstantDecl" || child.name.is_empty() {
                continue;
            }
            let value = match child.first_value() {
                Some(literal) => literal
                    .parse()
                    .with_context(|| format!("bad value {literal:?} for {}", child.name))?,
                None => next,
            };
            next = value + 1;
            constants.push(Constant {
                name: child.name.clone(),
                value,
            });
        }
        Ok(constants)
    }
}

fn find_enum_decls<'a>(node: &'a AstNode, names: &[&str], found: &mut Vec<&'a AstNode>) {
    if node.is_enum_definition() && names.contains(&node.name.as_str()) {
        found.push(node);
    }
    for child in &node.inner {
        find_enum_decls(child, names, found);
    }
}

/// Extract the enumerators of each named enum.
///
/// Each name must have exactly one definition in the tree.
pub fn parse_enums(root: &AstNode, names: &[&str]) -> Result<HashMap<String, Vec<Constant>>> {
    let mut found = Vec::new();
    find_enum_decls(root, names, &mut found);

    let mut result = HashMap::with_capacity(names.len());
    for name in names {
        let decls: Vec<_> = found.iter().filter(|decl| decl.name == *name).collect();
        if decls.len() != 1 {
            bail!("expected 1 enum {name}, found {}", decls.len());
        }
        result.insert((*name).to_owned(), decls[0].constants()?);
    }
    Ok(result)
}

/// Run clang over `header` and return its JSON AST.
pub fn dump_ast(clang: &str, header: &str) -> Result<Vec<u8>> {
    let mut child = Command::new(clang)
        .args(["-Xclang", "-ast-dump=json", "-xobjective-c", "-fsyntax-only", "-"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .with_context(|| format!("Failed to run {clang}"))?;

    child
        .stdin
        .take()
        .context("clang stdin unavailable")?
        .write_all(format!("#import <{header}>\n").as_bytes())
        .context("Failed to write clang input")?;

    let output = child.wait_with_output().context("clang failed")?;
    if !output.status.success() {
        bail!("clang failed: {}", output.status);
    }
    Ok(output.stdout)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"{
      "kind": "TranslationUnitDecl",
      "inner": [
        { "kind": "EnumDecl", "name": "LAError" },
        {
          "kind": "EnumDecl",
          "name": "LAError",
          "inner": [
            { "kind": "EnumConstantDecl", "name": "LAErrorAuthenticationFailed",
              "inner": [{ "kind": "ConstantExpr", "value": "-1",
                          "inner": [{ "kind": "DeclRefExpr" }] }] },
            { "kind": "EnumConstantDecl", "name": "LAErrorUserCancel",
              "inner": [{ "kind": "ConstantExpr", "value": "-2" }] }
          ]
        },
        {
          "kind": "EnumDecl",
          "name": "Counting",
          "inner": [
            { "kind": "EnumConstantDecl", "name": "Zero" },
            { "kind": "EnumConstantDecl", "name": "Five",
              "inner": [{ "kind": "ConstantExpr", "value": "5" }] },
            { "kind": "EnumConstantDecl", "name": "Six" }
          ]
        }
      ]
    }"#;

    fn root() -> AstNode {
        serde_json::from_str(FIXTURE).unwrap()
    }

    #[test]
    fn skips_forward_declarations() {
        let enums = parse_enums(&root(), &["LAError"]).unwrap();
        assert_eq!(
            enums["LAError"],
            [
                Constant { name: "LAErrorAuthenticationFailed".into(), value: -1 },
                Constant { name: "LAErrorUserCancel".into(), value: -2 },
            ]
        );
    }

    #[test]
    fn implicit_values_continue_from_the_previous() {
        let enums = parse_enums(&root(), &["Counting"]).unwrap();
        let values: Vec<_> = enums["Counting"].iter().map(|c| c.value).collect();
        assert_eq!(values, [0, 5, 6]);
    }

    #[test]
    fn missing_enum_is_an_error() {
        let err = parse_enums(&root(), &["LAPolicy"]).unwrap_err();
        assert_eq!(err.to_string(), "expected 1 enum LAPolicy, found 0");
    }

    #[test]
    fn tolerates_non_string_literal_values() {
        let json = r#"{
          "kind": "TranslationUnitDecl",
          "inner": [
            { "kind": "FunctionDecl", "name": "NSLocationInRange",
              "inner": [{ "kind": "ReturnStmt",
                          "inner": [{ "kind": "ObjCBoolLiteralExpr", "value": true }] }] },
            { "kind": "VarDecl", "name": "separator",
              "inner": [{ "kind": "CharacterLiteral", "value": 44 }] },
            { "kind": "EnumDecl", "name": "LAPolicy",
              "inner": [
                { "kind": "EnumConstantDecl", "name": "LAPolicyDeviceOwnerAuthentication",
                  "inner": [{ "kind": "ConstantExpr", "value": "2" }] }
              ] }
          ]
        }"#;
        let root: AstNode = serde_json::from_str(json).unwrap();
        let enums = parse_enums(&root, &["LAPolicy"]).unwrap();
        assert_eq!(
            enums["LAPolicy"],
            [Constant { name: "LAPolicyDeviceOwnerAuthentication".into(), value: 2 }]
        );
    }

    #[test]
    fn duplicate_definitions_are_an_error() {
        let mut root = root();
        let copy: AstNode = serde_json::from_str(FIXTURE).unwrap();
        root.inner.extend(copy.inner);
        assert!(parse_enums(&root, &["LAError"]).is_err());
    }
}
