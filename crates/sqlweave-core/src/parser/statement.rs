//! Statement parsing beyond SELECT.

use std::sync::Arc;

use tracing::trace;

use super::error::ParseError;
use super::parser::{Parser, STATEMENT_KEYWORDS};
use crate::ast::{
    Annotation, AssignOp, Assignment, BinaryOp, ColumnDef, Cte, DeclareStatement, Declaration,
    DeleteStatement, ExecuteStatement, Expr, IfStatement, InsertSource, InsertStatement,
    KeywordValue, MergeAction, MergeScope, MergeStatement, MergeWhen, ProcedureArg,
    SelectStatement, SetBody, SetStatement, Statement, StatementList, TableSource,
    UnknownStatement, UpdateStatement, WithStatement,
};
use crate::dialect::IfStyle;
use crate::lexer::{Token, TokenKind};
use crate::visit::{find_nodes, NodeRef};

/// Words after BEGIN that start a transaction or error-handling block
/// rather than a statement list.
const BEGIN_MODIFIERS: &[&str] = &["TRAN", "TRANSACTION", "WORK", "TRY", "CATCH", "DISTRIBUTED"];

impl Parser<'_> {
    // =========================================================================
    // WITH
    // =========================================================================

    pub(super) fn parse_with(&mut self) -> Result<Statement, ParseError> {
        let location = self.expect_keyword("WITH")?.location;
        self.eat_keyword("RECURSIVE");
        let ctes = self.parse_comma_separated(Self::parse_cte)?;

        let token = self.tokens.peek();
        let body_allowed = ["SELECT", "INSERT", "UPDATE", "DELETE", "MERGE"]
            .iter()
            .any(|k| token.is_keyword(k));
        if !body_allowed {
            return Err(ParseError::unexpected(
                "SELECT, INSERT, UPDATE, DELETE or MERGE",
                token,
            ));
        }
        let body = self.parse_statement()?;

        Ok(Statement::With(Arc::new(WithStatement {
            ctes,
            body,
            scope: Annotation::new(),
            location,
        })))
    }

    fn parse_cte(&mut self) -> Result<Arc<Cte>, ParseError> {
        let name = self.parse_identifier()?;
        let columns = if self.peek_symbol("(") {
            self.parse_identifier_list()?
        } else {
            vec![]
        };
        self.expect_keyword("AS")?;
        let query = self.parse_subquery()?;
        let recursive = refers_to(&query.inner, &name.value);
        trace!(cte = %name.value, recursive, "parsed common table expression");
        Ok(Arc::new(Cte {
            location: name.location,
            name,
            columns,
            query,
            recursive,
        }))
    }

    // =========================================================================
    // INSERT / UPDATE / DELETE
    // =========================================================================

    pub(super) fn parse_insert(&mut self) -> Result<Statement, ParseError> {
        let location = self.expect_keyword("INSERT")?.location;
        self.eat_keyword("INTO");
        let target = self.parse_table_reference(false)?;
        if target.alias.is_some() {
            return Err(ParseError::new(
                "INSERT target cannot be aliased",
                target.location,
            ));
        }

        let columns = if self.peek_symbol("(") && !self.starts_subquery() {
            self.parse_identifier_list()?
        } else {
            vec![]
        };

        let source = if self.eat_keyword("VALUES") {
            InsertSource::Values(self.parse_comma_separated(Self::parse_expression_row)?)
        } else if self.eat_keyword("DEFAULT") {
            self.expect_keyword("VALUES")?;
            InsertSource::DefaultValues
        } else if self.peek_keyword("SELECT") {
            InsertSource::Query(self.parse_select()?)
        } else {
            return Err(ParseError::unexpected(
                "VALUES, SELECT or DEFAULT VALUES",
                self.tokens.peek(),
            ));
        };

        Ok(Statement::Insert(Arc::new(InsertStatement {
            target: target.target,
            columns,
            source,
            scope: Annotation::new(),
            location,
        })))
    }

    pub(super) fn parse_update(&mut self) -> Result<Statement, ParseError> {
        let location = self.expect_keyword("UPDATE")?.location;
        let top = self.parse_top()?;
        let target = Arc::new(self.parse_table_reference(false)?);
        self.expect_keyword("SET")?;
        let assignments = self.parse_comma_separated(Self::parse_assignment)?;
        let from = self.parse_optional_from()?;
        let where_clause = self.parse_optional_where()?;

        Ok(Statement::Update(Arc::new(UpdateStatement {
            top,
            target,
            assignments,
            from,
            where_clause,
            scope: Annotation::new(),
            location,
        })))
    }

    pub(super) fn parse_delete(&mut self) -> Result<Statement, ParseError> {
        let location = self.expect_keyword("DELETE")?.location;
        let top = self.parse_top()?;
        self.eat_keyword("FROM");
        let target = Arc::new(self.parse_table_reference(false)?);
        let from = self.parse_optional_from()?;
        let where_clause = self.parse_optional_where()?;

        Ok(Statement::Delete(Arc::new(DeleteStatement {
            top,
            target,
            from,
            where_clause,
            scope: Annotation::new(),
            location,
        })))
    }

    fn parse_optional_from(&mut self) -> Result<Vec<TableSource>, ParseError> {
        if self.eat_keyword("FROM") {
            self.parse_comma_separated(Self::parse_table_source)
        } else {
            Ok(vec![])
        }
    }

    fn parse_optional_where(&mut self) -> Result<Option<Expr>, ParseError> {
        if self.eat_keyword("WHERE") {
            Ok(Some(self.parse_expression()?))
        } else {
            Ok(None)
        }
    }

    /// Parses `target = value`, `target := value` or, where supported,
    /// `target += value`.
    fn parse_assignment(&mut self) -> Result<Assignment, ParseError> {
        let target = self.parse_assignment_target()?;
        let token = self.tokens.next();
        let op = match token.value.as_str() {
            _ if token.kind != TokenKind::Symbol => None,
            "=" | ":=" => Some(AssignOp::Assign),
            symbol if self.dialect.supports_compound_assignment() => {
                BinaryOp::compound_assignment(symbol).map(AssignOp::Compound)
            }
            _ => None,
        };
        let Some(op) = op else {
            self.tokens.put_back(token.clone());
            return Err(ParseError::unexpected("assignment operator", token));
        };
        let value = self.parse_expression()?;
        Ok(Assignment { target, op, value })
    }

    fn parse_assignment_target(&mut self) -> Result<Expr, ParseError> {
        let token = self.tokens.peek();
        match token.kind {
            TokenKind::Variable => {
                self.tokens.next();
                Ok(Expr::variable(token.value, token.location))
            }
            TokenKind::Identifier => {
                let name = self.parse_object_identifier()?;
                if name.parts.len() > 2 {
                    return Err(ParseError::new(
                        format!("Cannot assign to {}", name.dotted()),
                        name.location,
                    ));
                }
                Ok(Expr::Identifier(Arc::new(name)))
            }
            _ => Err(ParseError::unexpected("assignment target", token)),
        }
    }

    // =========================================================================
    // MERGE
    // =========================================================================

    pub(super) fn parse_merge(&mut self) -> Result<Statement, ParseError> {
        let location = self.expect_keyword("MERGE")?.location;
        self.eat_keyword("INTO");
        let target = Arc::new(self.parse_table_reference(false)?);
        self.expect_keyword("USING")?;
        let source = self.parse_table_factor()?;
        self.expect_keyword("ON")?;
        let condition = self.parse_expression()?;

        let mut clauses = Vec::new();
        while self.peek_keyword("WHEN") {
            clauses.push(Arc::new(self.parse_merge_when()?));
        }
        if clauses.is_empty() {
            return Err(ParseError::unexpected("WHEN", self.tokens.peek()));
        }

        Ok(Statement::Merge(Arc::new(MergeStatement {
            target,
            source,
            condition,
            clauses,
            scope: Annotation::new(),
            location,
        })))
    }

    fn parse_merge_when(&mut self) -> Result<MergeWhen, ParseError> {
        let location = self.expect_keyword("WHEN")?.location;
        let matched = !self.eat_keyword("NOT");
        self.expect_keyword("MATCHED")?;
        let scope = if self.eat_keyword("BY") {
            if self.eat_word("SOURCE") {
                Some(MergeScope::Source)
            } else if self.eat_word("TARGET") {
                Some(MergeScope::Target)
            } else {
                return Err(ParseError::unexpected("SOURCE or TARGET", self.tokens.peek()));
            }
        } else {
            None
        };
        let condition = if self.eat_keyword("AND") {
            Some(self.parse_expression()?)
        } else {
            None
        };
        self.expect_keyword("THEN")?;

        let action = if self.eat_keyword("UPDATE") {
            self.expect_keyword("SET")?;
            MergeAction::Update(self.parse_comma_separated(Self::parse_assignment)?)
        } else if self.eat_keyword("DELETE") {
            MergeAction::Delete
        } else if self.eat_keyword("INSERT") {
            let columns = if self.peek_symbol("(") {
                self.parse_identifier_list()?
            } else {
                vec![]
            };
            let values = if self.eat_keyword("DEFAULT") {
                self.expect_keyword("VALUES")?;
                None
            } else {
                self.expect_keyword("VALUES")?;
                Some(self.parse_expression_row()?)
            };
            MergeAction::Insert { columns, values }
        } else {
            return Err(ParseError::unexpected(
                "UPDATE, DELETE or INSERT",
                self.tokens.peek(),
            ));
        };

        Ok(MergeWhen {
            matched,
            scope,
            condition,
            action,
            location,
        })
    }

    // =========================================================================
    // DECLARE / SET
    // =========================================================================

    pub(super) fn parse_declare(&mut self) -> Result<Statement, ParseError> {
        let location = self.expect_keyword("DECLARE")?.location;
        let declarations = self.parse_comma_separated(Self::parse_declaration)?;
        Ok(Statement::Declare(Arc::new(DeclareStatement {
            declarations,
            location,
        })))
    }

    fn parse_declaration(&mut self) -> Result<Arc<Declaration>, ParseError> {
        let token = self.tokens.next();
        let location = token.location;
        let name = match token.kind {
            TokenKind::Variable => Expr::variable(token.value, location),
            TokenKind::Identifier => Expr::identifier(token.value, location),
            _ => {
                self.tokens.put_back(token.clone());
                return Err(ParseError::unexpected("variable name", token));
            }
        };
        self.eat_keyword("AS");

        let (data_type, table_columns) = if self.eat_keyword("TABLE") {
            let columns = self
                .parse_paren(|p| p.parse_comma_separated(Self::parse_column_def))?
                .inner;
            (None, Some(columns))
        } else {
            (Some(Arc::new(self.parse_data_type()?)), None)
        };

        let initial = if table_columns.is_none()
            && (self.eat_symbol("=") || self.eat_symbol(":=") || self.eat_keyword("DEFAULT"))
        {
            Some(self.parse_expression()?)
        } else {
            None
        };

        Ok(Arc::new(Declaration {
            name,
            data_type,
            table_columns,
            initial,
            location,
        }))
    }

    fn parse_column_def(&mut self) -> Result<ColumnDef, ParseError> {
        let name = self.parse_identifier()?;
        let data_type = Arc::new(self.parse_data_type()?);
        let mut nullable = None;
        let mut primary_key = false;
        loop {
            if self.eat_keyword("NOT") {
                self.expect_keyword("NULL")?;
                nullable = Some(false);
            } else if self.eat_keyword("NULL") {
                nullable = Some(true);
            } else if self.eat_word("PRIMARY") {
                if !self.eat_word("KEY") {
                    return Err(ParseError::unexpected("KEY", self.tokens.peek()));
                }
                primary_key = true;
            } else {
                break;
            }
        }
        Ok(ColumnDef {
            location: name.location,
            name,
            data_type,
            nullable,
            primary_key,
        })
    }

    pub(super) fn parse_set(&mut self) -> Result<Statement, ParseError> {
        let location = self.expect_keyword("SET")?.location;
        // Where assignments need no SET, SET only changes settings.
        let body = if self.dialect.set_keyword() && self.is_assignment_ahead() {
            SetBody::Assign(self.parse_assignment()?)
        } else {
            let name = self.parse_identifier()?;
            if !self.eat_symbol("=") {
                self.eat_word("TO");
            }
            let token = self.tokens.peek();
            let value = match token.kind {
                TokenKind::Keyword | TokenKind::Identifier if !token.quoted => {
                    self.tokens.next();
                    Expr::Keyword(Arc::new(KeywordValue {
                        keyword: token.value.to_ascii_uppercase(),
                        location: token.location,
                    }))
                }
                _ => self.parse_expression()?,
            };
            SetBody::Option { name, value }
        };
        Ok(Statement::Set(Arc::new(SetStatement { body, location })))
    }

    /// Returns true if a variable, or a name followed by an assignment
    /// operator, is next.
    fn is_assignment_ahead(&mut self) -> bool {
        match self.tokens.peek_kind() {
            TokenKind::Variable => true,
            TokenKind::Identifier => {
                let mark = self.tokens.mark();
                let ahead = self.parse_object_identifier().is_ok() && {
                    let token = self.tokens.peek();
                    token.kind == TokenKind::Symbol
                        && (token.value == "="
                            || token.value == ":="
                            || BinaryOp::compound_assignment(&token.value).is_some())
                };
                self.tokens.reset(mark);
                ahead
            }
            _ => false,
        }
    }

    /// Parses `name := value` as an assignment statement.
    ///
    /// For dialects where assignment needs no leading keyword. Returns
    /// `None`, with the stream untouched, unless the statement starts that
    /// way.
    pub fn parse_bare_assignment(&mut self) -> Option<Result<Statement, ParseError>> {
        if self.tokens.peek_kind() != TokenKind::Identifier {
            return None;
        }
        let mark = self.tokens.mark();
        let location = self.location();
        let ahead = self.parse_object_identifier().is_ok() && self.peek_symbol(":=");
        self.tokens.reset(mark);
        if !ahead {
            return None;
        }
        Some(self.parse_assignment().map(|assignment| {
            Statement::Set(Arc::new(SetStatement {
                body: SetBody::Assign(assignment),
                location,
            }))
        }))
    }

    // =========================================================================
    // IF / BEGIN ... END
    // =========================================================================

    pub(super) fn parse_if(&mut self) -> Result<Statement, ParseError> {
        let location = self.expect_keyword("IF")?.location;
        let condition = self.parse_expression()?;

        let (then_branch, else_branch) =
            if self.dialect.if_style() == IfStyle::Block || self.peek_keyword("THEN") {
                self.parse_if_block()?
            } else {
                self.parse_if_compact()?
            };

        Ok(Statement::If(Arc::new(IfStatement {
            condition,
            then_branch,
            else_branch,
            location,
        })))
    }

    /// `THEN stmts [ELSE stmts] END IF`
    fn parse_if_block(&mut self) -> Result<(Statement, Option<Statement>), ParseError> {
        let location = self.expect_keyword("THEN")?.location;
        let statements = self.parse_statements(&["ELSE", "END"])?;
        let then_branch = Statement::Block(Arc::new(StatementList::new(
            statements, false, location,
        )));

        let else_branch = if self.peek_keyword("ELSE") {
            let location = self.tokens.next().location;
            let statements = self.parse_statements(&["END"])?;
            Some(Statement::Block(Arc::new(StatementList::new(
                statements, false, location,
            ))))
        } else {
            None
        };

        self.expect_keyword("END")?;
        self.expect_keyword("IF")?;
        Ok((then_branch, else_branch))
    }

    /// `stmt [;] [ELSE stmt]`
    fn parse_if_compact(&mut self) -> Result<(Statement, Option<Statement>), ParseError> {
        let then_branch = self.parse_statement()?;
        let mark = self.tokens.mark();
        self.tokens.skip(TokenKind::Symbol, Some(";"));
        if self.eat_keyword("ELSE") {
            return Ok((then_branch, Some(self.parse_statement()?)));
        }
        self.tokens.reset(mark);
        Ok((then_branch, None))
    }

    /// Parses `BEGIN stmts END`. Returns `None`, with the stream
    /// untouched, for `BEGIN TRANSACTION` and friends.
    pub(super) fn parse_block(&mut self) -> Result<Option<StatementList>, ParseError> {
        let mark = self.tokens.mark();
        let location = self.expect_keyword("BEGIN")?.location;
        let next = self.tokens.peek();
        let is_modifier = next.is_symbol(";")
            || next.is_end()
            || (matches!(next.kind, TokenKind::Keyword | TokenKind::Identifier)
                && BEGIN_MODIFIERS
                    .iter()
                    .any(|m| next.value.eq_ignore_ascii_case(m)));
        if is_modifier {
            self.tokens.reset(mark);
            return Ok(None);
        }

        let statements = self.parse_statements(&["END"])?;
        self.expect_keyword("END")?;
        Ok(Some(StatementList::new(statements, true, location)))
    }

    // =========================================================================
    // EXEC / CALL
    // =========================================================================

    /// Parses `EXEC [@status =] procedure [arg, ...]`.
    ///
    /// # Errors
    ///
    /// Returns a `ParseError` if the statement is malformed.
    pub fn parse_execute(&mut self) -> Result<Statement, ParseError> {
        let token = self.tokens.next();
        if !(token.is_keyword("EXEC") || token.is_keyword("EXECUTE")) {
            self.tokens.put_back(token.clone());
            return Err(ParseError::unexpected("EXEC", token));
        }
        let location = token.location;

        let mark = self.tokens.mark();
        let status = self.tokens.next();
        let return_status = if status.kind == TokenKind::Variable && self.eat_symbol("=") {
            Some(Expr::variable(status.value, status.location))
        } else {
            self.tokens.reset(mark);
            None
        };

        let procedure = Arc::new(self.parse_object_identifier()?);
        let args = if self.starts_exec_argument() {
            self.parse_comma_separated(Self::parse_exec_argument)?
        } else {
            vec![]
        };

        Ok(Statement::Execute(Arc::new(ExecuteStatement {
            return_status,
            procedure,
            args,
            location,
        })))
    }

    fn starts_exec_argument(&mut self) -> bool {
        let token = self.tokens.peek();
        match token.kind {
            TokenKind::Variable
            | TokenKind::Number
            | TokenKind::QuotedString
            | TokenKind::Identifier => true,
            TokenKind::Symbol => token.value == "-" || token.value == "(",
            TokenKind::Keyword => token.value == "NULL" || token.value == "DEFAULT",
            _ => false,
        }
    }

    fn parse_exec_argument(&mut self) -> Result<ProcedureArg, ParseError> {
        let mark = self.tokens.mark();
        let token = self.tokens.next();
        let name = if token.kind == TokenKind::Variable && self.eat_symbol("=") {
            Some(Expr::variable(token.value, token.location))
        } else {
            self.tokens.reset(mark);
            None
        };
        let value = self.parse_expression()?;
        let output = self.eat_word("OUTPUT") || self.eat_word("OUT");
        Ok(ProcedureArg {
            name,
            value,
            output,
        })
    }

    /// Parses `CALL procedure([name =>] value, ...)`.
    ///
    /// # Errors
    ///
    /// Returns a `ParseError` if the statement is malformed.
    pub fn parse_call(&mut self) -> Result<Statement, ParseError> {
        let location = self.expect_keyword("CALL")?.location;
        let procedure = Arc::new(self.parse_object_identifier()?);
        self.expect_symbol("(")?;
        let args = if self.peek_symbol(")") {
            vec![]
        } else {
            self.parse_comma_separated(Self::parse_call_argument)?
        };
        self.expect_symbol(")")?;

        Ok(Statement::Execute(Arc::new(ExecuteStatement {
            return_status: None,
            procedure,
            args,
            location,
        })))
    }

    fn parse_call_argument(&mut self) -> Result<ProcedureArg, ParseError> {
        let mark = self.tokens.mark();
        let token = self.tokens.next();
        let name = if token.kind == TokenKind::Identifier && self.eat_symbol("=>") {
            Some(Expr::identifier(token.value, token.location))
        } else {
            self.tokens.reset(mark);
            None
        };
        let value = self.parse_expression()?;
        Ok(ProcedureArg {
            name,
            value,
            output: false,
        })
    }

    // =========================================================================
    // Unknown statements
    // =========================================================================

    /// Captures an unrecognized statement as raw tokens in permissive
    /// dialects.
    ///
    /// Capture always takes the first token, then stops before `;`, end of
    /// input, or, outside parentheses and CASE, before END, ELSE or a
    /// statement keyword that starts a new line.
    pub(super) fn parse_unknown(&mut self) -> Result<Statement, ParseError> {
        let first = self.tokens.next();
        if first.is_end() || !self.dialect.permissive() {
            self.tokens.put_back(first.clone());
            return Err(ParseError::unexpected("statement", first));
        }

        let location = first.location;
        let mut line = first.location.line;
        let mut parens = 0usize;
        let mut cases = usize::from(first.is_keyword("CASE"));
        let mut tokens = vec![first];

        loop {
            let token = self.tokens.peek();
            if token.is_end() || (parens == 0 && token.is_symbol(";")) {
                break;
            }
            if parens == 0 && cases == 0 && ends_unknown(&token, line) {
                break;
            }
            match token.kind {
                TokenKind::Symbol if token.value == "(" => parens += 1,
                TokenKind::Symbol if token.value == ")" => parens = parens.saturating_sub(1),
                TokenKind::Keyword if token.value == "CASE" => cases += 1,
                TokenKind::Keyword if token.value == "END" => cases = cases.saturating_sub(1),
                _ => {}
            }
            line = token.location.line;
            tokens.push(self.tokens.next());
        }

        trace!(tokens = tokens.len(), "captured unknown statement");
        Ok(Statement::Unknown(Arc::new(UnknownStatement {
            tokens,
            location,
        })))
    }
}

fn ends_unknown(token: &Token, previous_line: u32) -> bool {
    if token.kind != TokenKind::Keyword {
        return false;
    }
    if token.value == "END" || token.value == "ELSE" {
        return true;
    }
    token.location.line > previous_line && STATEMENT_KEYWORDS.contains(&token.value.as_str())
}

/// Returns true if `query` reads from a table named `name`.
fn refers_to(query: &SelectStatement, name: &str) -> bool {
    let found = find_nodes(NodeRef::Query(query), |node| {
        let NodeRef::TableSource(TableSource::Table(table)) = node else {
            return false;
        };
        matches!(
            &table.target,
            Expr::Identifier(id) if id.is_single() && id.name().eq_ignore_ascii_case(name)
        )
    });
    !found.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::StandardDialect;
    use crate::parser::parse_with;

    fn statement(sql: &str) -> Statement {
        let mut list = parse_with(sql, &StandardDialect).expect("statement parses");
        assert_eq!(list.len(), 1);
        list.statements.remove(0)
    }

    #[test]
    fn test_cte_self_reference_is_recursive() {
        let Statement::With(with) = statement("WITH c AS (SELECT * FROM c) SELECT * FROM c") else {
            panic!("expected WITH");
        };
        assert!(with.ctes[0].recursive);
        assert!(with.is_recursive());

        let Statement::With(with) = statement("WITH c AS (SELECT * FROM t) SELECT * FROM c") else {
            panic!("expected WITH");
        };
        assert!(!with.ctes[0].recursive);
    }

    #[test]
    fn test_cte_reference_in_subquery_counts() {
        let sql = "WITH c AS (SELECT 1 AS n UNION ALL SELECT n FROM t WHERE n IN (SELECT n FROM c)) SELECT * FROM c";
        let Statement::With(with) = statement(sql) else {
            panic!("expected WITH");
        };
        assert!(with.ctes[0].recursive);
    }

    #[test]
    fn test_if_block_form() {
        let Statement::If(stmt) =
            statement("IF a = 1 THEN SELECT 1; SELECT 2; ELSE SELECT 3; END IF")
        else {
            panic!("expected IF");
        };
        let Statement::Block(then_branch) = &stmt.then_branch else {
            panic!("expected statement list");
        };
        assert_eq!(then_branch.len(), 2);
        assert!(!then_branch.bracketed);
        assert!(stmt.else_branch.is_some());
    }

    #[test]
    fn test_begin_end_block() {
        let Statement::Block(block) = statement("BEGIN SELECT 1; SELECT 2 END") else {
            panic!("expected block");
        };
        assert!(block.bracketed);
        assert_eq!(block.len(), 2);
    }

    #[test]
    fn test_begin_transaction_is_not_a_block() {
        let err = parse_with("BEGIN TRANSACTION", &StandardDialect).expect_err("strict");
        assert_eq!(err.found.as_deref(), Some("keyword 'BEGIN'"));
    }

    #[test]
    fn test_merge_clauses() {
        let sql = "MERGE INTO t USING s ON t.id = s.id \
                   WHEN MATCHED AND s.gone = 1 THEN DELETE \
                   WHEN MATCHED THEN UPDATE SET v = s.v \
                   WHEN NOT MATCHED THEN INSERT (id, v) VALUES (s.id, s.v)";
        let Statement::Merge(merge) = statement(sql) else {
            panic!("expected MERGE");
        };
        assert_eq!(merge.clauses.len(), 3);
        assert!(merge.clauses[0].condition.is_some());
        assert!(!merge.clauses[2].matched);
    }

    #[test]
    fn test_merge_requires_when() {
        let err = parse_with("MERGE INTO t USING s ON t.id = s.id", &StandardDialect)
            .expect_err("no WHEN");
        assert_eq!(err.expected.as_deref(), Some("WHEN"));
    }

    #[test]
    fn test_call_named_arguments() {
        let Statement::Execute(call) = statement("CALL proc(1, mode => 'fast')") else {
            panic!("expected CALL");
        };
        assert_eq!(call.args.len(), 2);
        assert!(call.args[0].name.is_none());
        assert!(call.args[1].name.is_some());
    }

    #[test]
    fn test_insert_default_values() {
        let Statement::Insert(insert) = statement("INSERT INTO t DEFAULT VALUES") else {
            panic!("expected INSERT");
        };
        assert_eq!(insert.source, InsertSource::DefaultValues);
    }

    #[test]
    fn test_declare_with_default() {
        let Statement::Declare(declare) = statement("DECLARE total INT DEFAULT 0, name VARCHAR(20)")
        else {
            panic!("expected DECLARE");
        };
        assert_eq!(declare.declarations.len(), 2);
        assert!(declare.declarations[0].initial.is_some());
        assert_eq!(
            declare.declarations[1]
                .data_type
                .as_ref()
                .map(ToString::to_string)
                .as_deref(),
            Some("VARCHAR(20)")
        );
    }

    #[test]
    fn test_unknown_statement_is_error_in_strict_dialect() {
        let err = parse_with("VACUUM", &StandardDialect).expect_err("strict");
        assert_eq!(err.expected.as_deref(), Some("statement"));
    }
}
