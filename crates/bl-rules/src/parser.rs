//! Recursive-descent parser for rule logic strings.
//!
//! ```text
//! rule      := IF or_expr THEN action
//! or_expr   := and_expr (OR and_expr)*
//! and_expr  := primary (AND primary)*
//! primary   := '(' or_expr ')' | '(' ident OP 'value' ')'
//! action    := (MODIFY | ADD FIELD | ENRICH | MERGE | SPLIT) ident '=' 'value'
//!            | GENERATE NxM RECORDS FOR UNIQUE COMBINATIONS OF '[' key ']' x '[' key ']'
//! ```
//!
//! Keywords are case-insensitive. Identifiers are bare words or
//! double-quoted names.

use std::str::FromStr;

use crate::ast::{Action, ActionVerb, Clause, Condition, RuleLogic};
use crate::error::ParseError;
use crate::lexer::{Spanned, Token, tokenize};

/// Parse a rule logic string into its AST.
///
/// # Errors
///
/// Returns a `ParseError` describing the first token that does not fit the
/// grammar.
pub fn parse(logic: &str) -> Result<RuleLogic, ParseError> {
    let tokens = tokenize(logic)?;
    if tokens.is_empty() {
        return Err(ParseError::Empty);
    }
    let mut parser = Parser { tokens, pos: 0 };
    let rule = parser.rule()?;
    parser.expect_end()?;
    Ok(rule)
}

impl FromStr for RuleLogic {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

struct Parser {
    tokens: Vec<Spanned>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|s| &s.token)
    }

    fn error(&self, expected: &str) -> ParseError {
        match self.tokens.get(self.pos) {
            Some(spanned) => ParseError::UnexpectedToken {
                expected: expected.to_string(),
                found: spanned.token.to_string(),
                position: spanned.position,
            },
            None => ParseError::UnexpectedEnd {
                expected: expected.to_string(),
            },
        }
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        if self.peek().is_some_and(|t| t.is_keyword(keyword)) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect_keyword(&mut self, keyword: &str) -> Result<(), ParseError> {
        if self.eat_keyword(keyword) {
            Ok(())
        } else {
            Err(self.error(keyword))
        }
    }

    fn expect(&mut self, token: &Token, expected: &str) -> Result<(), ParseError> {
        if self.peek() == Some(token) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.error(expected))
        }
    }

    fn expect_end(&self) -> Result<(), ParseError> {
        if self.pos < self.tokens.len() {
            Err(self.error("end of rule"))
        } else {
            Ok(())
        }
    }

    fn ident(&mut self) -> Result<String, ParseError> {
        match self.peek() {
            Some(Token::Word(w) | Token::QuotedIdent(w)) => {
                let name = w.clone();
                self.pos += 1;
                Ok(name)
            }
            _ => Err(self.error("field name")),
        }
    }

    fn literal(&mut self) -> Result<String, ParseError> {
        match self.peek() {
            Some(Token::Str(s)) => {
                let value = s.clone();
                self.pos += 1;
                Ok(value)
            }
            _ => Err(self.error("quoted value")),
        }
    }

    fn rule(&mut self) -> Result<RuleLogic, ParseError> {
        self.expect_keyword("IF")?;
        let condition = self.or_expr()?;
        self.expect_keyword("THEN")?;
        let action = self.action()?;
        Ok(RuleLogic { condition, action })
    }

    fn or_expr(&mut self) -> Result<Condition, ParseError> {
        let mut lhs = self.and_expr()?;
        while self.eat_keyword("OR") {
            let rhs = self.and_expr()?;
            lhs = lhs.or(rhs);
        }
        Ok(lhs)
    }

    fn and_expr(&mut self) -> Result<Condition, ParseError> {
        let mut lhs = self.primary()?;
        while self.eat_keyword("AND") {
            let rhs = self.primary()?;
            lhs = lhs.and(rhs);
        }
        Ok(lhs)
    }

    fn primary(&mut self) -> Result<Condition, ParseError> {
        self.expect(&Token::LParen, "'('")?;

        if self.peek() == Some(&Token::LParen) {
            let inner = self.or_expr()?;
            self.expect(&Token::RParen, "')'")?;
            return Ok(inner);
        }

        let field = self.ident()?;
        let op = match self.peek() {
            Some(Token::Op(op)) => *op,
            _ => return Err(self.error("comparison operator")),
        };
        self.pos += 1;
        let value = self.literal()?;
        self.expect(&Token::RParen, "')'")?;
        Ok(Clause::new(field, op, value).into())
    }

    fn action(&mut self) -> Result<Action, ParseError> {
        if self.eat_keyword("GENERATE") {
            return self.matrix_split();
        }

        let verb = if self.eat_keyword("MODIFY") {
            ActionVerb::Modify
        } else if self.eat_keyword("ADD") {
            self.expect_keyword("FIELD")?;
            ActionVerb::AddField
        } else if self.eat_keyword("ENRICH") {
            ActionVerb::Enrich
        } else if self.eat_keyword("MERGE") {
            ActionVerb::Merge
        } else if self.eat_keyword("SPLIT") {
            ActionVerb::Split
        } else {
            return Err(self.error("action (MODIFY, ADD FIELD, ENRICH, MERGE, SPLIT, GENERATE)"));
        };

        let field = self.ident()?;
        self.expect(&Token::Assign, "'='")?;
        let value = self.literal()?;
        Ok(Action::Assign { verb, field, value })
    }

    fn matrix_split(&mut self) -> Result<Action, ParseError> {
        for keyword in ["NxM", "RECORDS", "FOR", "UNIQUE", "COMBINATIONS", "OF"] {
            self.expect_keyword(keyword)?;
        }
        let key_a = self.bracket_key()?;
        self.expect_keyword("x")?;
        let key_b = self.bracket_key()?;
        Ok(Action::MatrixSplit { key_a, key_b })
    }

    /// `[KEY]`; a key may span several words.
    fn bracket_key(&mut self) -> Result<String, ParseError> {
        self.expect(&Token::LBracket, "'['")?;
        let mut words = Vec::new();
        while let Some(Token::Word(w) | Token::QuotedIdent(w)) = self.peek() {
            words.push(w.clone());
            self.pos += 1;
        }
        if words.is_empty() {
            return Err(self.error("matrix key"));
        }
        self.expect(&Token::RBracket, "']'")?;
        Ok(words.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::CompareOp;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn assign(verb: ActionVerb, field: &str, value: &str) -> Action {
        Action::Assign {
            verb,
            field: field.into(),
            value: value.into(),
        }
    }

    fn eq(field: &str, value: &str) -> Condition {
        Clause::new(field, CompareOp::Eq, value).into()
    }

    #[test]
    fn parses_reference_rule() {
        let rule = parse("IF (Site == '1000') THEN MODIFY Plant = '1000'").unwrap();
        assert_eq!(
            rule,
            RuleLogic {
                condition: eq("Site", "1000"),
                action: assign(ActionVerb::Modify, "Plant", "1000"),
            }
        );
    }

    #[rstest]
    #[case("IF (a == '1') THEN MODIFY b = '2'", ActionVerb::Modify)]
    #[case("IF (a == '1') THEN ADD FIELD b = '2'", ActionVerb::AddField)]
    #[case("IF (a == '1') THEN ENRICH b = '2'", ActionVerb::Enrich)]
    #[case("IF (a == '1') THEN MERGE b = '2'", ActionVerb::Merge)]
    #[case("IF (a == '1') THEN SPLIT b = '2'", ActionVerb::Split)]
    #[case("if (a == '1') then add field b = '2'", ActionVerb::AddField)]
    fn parses_every_verb(#[case] logic: &str, #[case] verb: ActionVerb) {
        let rule = parse(logic).unwrap();
        assert_eq!(rule.action, assign(verb, "b", "2"));
    }

    #[rstest]
    #[case("==", CompareOp::Eq)]
    #[case("!=", CompareOp::Ne)]
    #[case(">", CompareOp::Gt)]
    #[case("<", CompareOp::Lt)]
    fn parses_every_operator(#[case] op: &str, #[case] expected: CompareOp) {
        let rule = parse(&format!("IF (Weight {op} '10') THEN MODIFY Class = 'H'")).unwrap();
        assert_eq!(rule.condition.first_clause().op, expected);
    }

    #[test]
    fn and_binds_tighter_than_or() {
        let rule = parse("IF (a == '1') OR (b == '2') AND (c == '3') THEN MODIFY d = '4'").unwrap();
        assert_eq!(rule.condition, eq("a", "1").or(eq("b", "2").and(eq("c", "3"))));
    }

    #[test]
    fn grouping_overrides_precedence() {
        let rule =
            parse("IF ((a == '1') OR (b == '2')) AND (c == '3') THEN MODIFY d = '4'").unwrap();
        assert_eq!(rule.condition, eq("a", "1").or(eq("b", "2")).and(eq("c", "3")));
    }

    #[test]
    fn quoted_identifiers_and_escapes() {
        let rule = parse(r#"IF ("Old Mat No" == 'O''Brien') THEN MODIFY "Sales Text" = 'it''s'"#)
            .unwrap();
        assert_eq!(rule.condition, eq("Old Mat No", "O'Brien"));
        assert_eq!(rule.action, assign(ActionVerb::Modify, "Sales Text", "it's"));
    }

    #[test]
    fn keyword_named_field_in_identifier_position() {
        let rule = parse("IF (Field == 'x') THEN MODIFY For = 'y'").unwrap();
        assert_eq!(rule.condition, eq("Field", "x"));
        assert_eq!(rule.action, assign(ActionVerb::Modify, "For", "y"));
    }

    #[test]
    fn parses_matrix_split() {
        let rule = parse(
            "IF (MTART == 'FERT') THEN GENERATE NxM RECORDS FOR UNIQUE COMBINATIONS OF [WERKS] x [LGORT]",
        )
        .unwrap();
        assert_eq!(
            rule.action,
            Action::MatrixSplit {
                key_a: "WERKS".into(),
                key_b: "LGORT".into(),
            }
        );
    }

    #[rstest]
    #[case("IF (Site == '1000') THEN MODIFY Plant = '1000'")]
    #[case("IF (a != 'x') AND (b > '5') OR (c < '2') THEN MERGE d = 'y'")]
    #[case("IF ((a == '1') OR (b == '2')) AND (c == '3') THEN SPLIT d = '4'")]
    #[case(r#"IF ("Old Mat No" == 'it''s') THEN ADD FIELD Plant = ''"#)]
    #[case("IF (a == '1') THEN GENERATE NxM RECORDS FOR UNIQUE COMBINATIONS OF [KEY_A] x [KEY_B]")]
    fn canonical_text_reparses(#[case] logic: &str) {
        let rule = parse(logic).unwrap();
        assert_eq!(rule.to_string(), logic);
        assert_eq!(parse(&rule.to_string()).unwrap(), rule);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("Site == '1000'")]
    #[case("IF Site == '1000' THEN MODIFY Plant = '1000'")]
    #[case("IF (Site == 1000) THEN MODIFY Plant = '1000'")]
    #[case("IF (Site = '1000') THEN MODIFY Plant = '1000'")]
    #[case("IF (Site == '1000') MODIFY Plant = '1000'")]
    #[case("IF (Site == '1000') THEN DELETE Plant = '1000'")]
    #[case("IF (Site == '1000') THEN ADD Plant = '1000'")]
    #[case("IF (Site == '1000') THEN MODIFY Plant '1000'")]
    #[case("IF (Site == '1000') THEN MODIFY Plant = '1000' extra")]
    #[case("IF (Site == '1000') AND THEN MODIFY Plant = '1000'")]
    #[case("IF (Site == '1000) THEN MODIFY Plant = '1000'")]
    #[case("IF (a == '1') THEN GENERATE NxM RECORDS FOR UNIQUE COMBINATIONS OF [] x [B]")]
    fn rejects_malformed_logic(#[case] logic: &str) {
        assert!(parse(logic).is_err(), "should reject: {logic}");
    }

    #[test]
    fn error_reports_position() {
        let err = parse("IF (Site == '1000') THEN DELETE Plant = '1000'").unwrap_err();
        assert_eq!(
            err,
            ParseError::UnexpectedToken {
                expected: "action (MODIFY, ADD FIELD, ENRICH, MERGE, SPLIT, GENERATE)".into(),
                found: "DELETE".into(),
                position: 25,
            }
        );
    }

    #[test]
    fn from_str_delegates() {
        let rule: RuleLogic = "IF (a == '1') THEN MODIFY b = '2'".parse().unwrap();
        assert_eq!(rule.condition, eq("a", "1"));
    }
}
