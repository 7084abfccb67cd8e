//! # Column Statements
//!
//! Turns one column into one schema-builder statement:
//!
//! ```text
//! $table->string('email', 255)->default('x')->nullable()->unique()->index()->comment('...');
//! ```
//!
//! Modifiers always follow the order default, nullable, unique, index,
//! unsigned, comment. Auto-increment columns use the increments form of their
//! type, never take a length, and drop the default and unsigned modifiers.

use schemer_core::DefaultValue;
use schemer_ir::Column;

/// Build the statement for a column.
pub fn build_column_statement(column: &Column) -> String {
    let mut stmt = String::with_capacity(64);

    stmt.push_str("$table->");
    if column.auto_inc {
        match column.column_type.increment_synonym() {
            Some(method) => stmt.push_str(method),
            None => {
                tracing::warn!(
                    column = %column.name,
                    column_type = %column.column_type,
                    "auto-increment on a non-integer type, keeping the type as-is",
                );
                stmt.push_str(column.column_type.as_str());
            }
        }
        stmt.push('(');
        stmt.push_str(&php_string(&column.name));
        stmt.push(')');
    } else {
        stmt.push_str(column.column_type.as_str());
        stmt.push('(');
        stmt.push_str(&php_string(&column.name));
        if let Some(length) = column.effective_length() {
            stmt.push_str(&format!(", {}", length));
        }
        stmt.push(')');
    }

    if !column.auto_inc {
        if let Some(value) = column.effective_default() {
            stmt.push_str(&format!("->default({})", default_literal(value)));
        }
    }

    if column.nullable {
        stmt.push_str("->nullable()");
    }

    if column.unique {
        stmt.push_str("->unique()");
    }

    if column.index {
        stmt.push_str("->index()");
    }

    if column.unsigned && !column.auto_inc {
        stmt.push_str("->unsigned()");
    }

    if let Some(comment) = column.effective_comment() {
        stmt.push_str(&format!("->comment({})", php_string(comment)));
    }

    stmt.push(';');
    stmt
}

/// Literal form of a default value
pub fn default_literal(value: &DefaultValue) -> String {
    match value {
        DefaultValue::Bool(b) => b.to_string(),
        DefaultValue::Integer(n) => n.to_string(),
        DefaultValue::Float(f) => f.to_string(),
        DefaultValue::Text(s) => match value.as_integer() {
            Some(int) => int.to_string(),
            None => php_string(s),
        },
    }
}

/// Single-quoted string literal, escaping backslashes and quotes
pub fn php_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for ch in value.chars() {
        if ch == '\\' || ch == '\'' {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push('\'');
    out
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use schemer_core::ColumnType;

    fn everything(name: &str) -> Column {
        let mut column = Column::new(name, ColumnType::String)
            .with_length(40)
            .with_default(DefaultValue::Text("guest".into()))
            .with_comment("display name");
        column.nullable = true;
        column.unique = true;
        column.index = true;
        column.unsigned = true;
        column
    }

    #[test]
    fn test_plain_column() {
        let column = Column::new("bio", ColumnType::Text);
        assert_eq!(build_column_statement(&column), "$table->text('bio');");
    }

    #[test]
    fn test_modifier_order() {
        assert_eq!(
            build_column_statement(&everything("nick")),
            "$table->string('nick', 40)->default('guest')->nullable()->unique()->index()->unsigned()->comment('display name');"
        );
    }

    #[test]
    fn test_field_order_in_json_does_not_matter() {
        let a: Column = serde_json::from_str(
            r#"{"comment": "c", "index": true, "name": "n", "nullable": true, "type": "integer", "defValue": 3}"#,
        )
        .unwrap();
        let b: Column = serde_json::from_str(
            r#"{"type": "integer", "defValue": 3, "nullable": true, "name": "n", "index": true, "comment": "c"}"#,
        )
        .unwrap();
        let expected = "$table->integer('n')->default(3)->nullable()->index()->comment('c');";
        assert_eq!(build_column_statement(&a), expected);
        assert_eq!(build_column_statement(&b), expected);
    }

    #[test]
    fn test_deterministic() {
        let column = everything("nick");
        let first = build_column_statement(&column);
        for _ in 0..10 {
            assert_eq!(build_column_statement(&column), first);
        }
    }

    #[test]
    fn test_auto_increment_suppression() {
        let mut column = everything("id");
        column.column_type = ColumnType::BigInteger;
        column.auto_inc = true;

        let stmt = build_column_statement(&column);
        assert_eq!(
            stmt,
            "$table->bigIncrements('id')->nullable()->unique()->index()->comment('display name');"
        );
        assert!(!stmt.contains("->default("));
        assert!(!stmt.contains("->unsigned()"));
    }

    #[test]
    fn test_auto_increment_never_takes_length() {
        let mut column = Column::new("code", ColumnType::String).with_length(8);
        column.auto_inc = true;
        assert_eq!(build_column_statement(&column), "$table->string('code');");
    }

    #[test]
    fn test_increment_synonyms() {
        let cases = [
            (ColumnType::Integer, "increments"),
            (ColumnType::BigInteger, "bigIncrements"),
            (ColumnType::SmallInteger, "smallIncrements"),
        ];
        for (ty, method) in cases {
            let mut column = Column::new("id", ty);
            column.auto_inc = true;
            assert_eq!(
                build_column_statement(&column),
                format!("$table->{}('id');", method)
            );
        }
    }

    #[test]
    fn test_length_only_for_char_and_string() {
        let char_col = Column::new("code", ColumnType::Char).with_length(3);
        assert_eq!(build_column_statement(&char_col), "$table->char('code', 3);");

        let int_col = Column::new("count", ColumnType::Integer).with_length(11);
        assert_eq!(build_column_statement(&int_col), "$table->integer('count');");

        let no_len = Column::new("title", ColumnType::String);
        assert_eq!(build_column_statement(&no_len), "$table->string('title');");
    }

    #[test]
    fn test_default_literals() {
        assert_eq!(default_literal(&DefaultValue::Integer(5)), "5");
        assert_eq!(default_literal(&DefaultValue::Float(0.5)), "0.5");
        assert_eq!(default_literal(&DefaultValue::Bool(false)), "false");
        assert_eq!(default_literal(&DefaultValue::Text("10".into())), "10");
        assert_eq!(default_literal(&DefaultValue::Text("010".into())), "'010'");
        assert_eq!(default_literal(&DefaultValue::Text("true".into())), "'true'");
        assert_eq!(default_literal(&DefaultValue::Text("draft".into())), "'draft'");
    }

    #[test]
    fn test_zero_string_is_a_default() {
        let column =
            Column::new("votes", ColumnType::Integer).with_default(DefaultValue::Text("0".into()));
        assert_eq!(
            build_column_statement(&column),
            "$table->integer('votes')->default(0);"
        );
    }

    #[test]
    fn test_empty_default_and_comment_are_skipped() {
        let column = Column::new("note", ColumnType::Text)
            .with_default(DefaultValue::Text(String::new()))
            .with_comment("");
        assert_eq!(build_column_statement(&column), "$table->text('note');");
    }

    #[test]
    fn test_quotes_are_escaped() {
        assert_eq!(php_string("it's"), r"'it\'s'");
        assert_eq!(php_string(r"C:\tmp"), r"'C:\\tmp'");

        let column = Column::new("motto", ColumnType::String).with_comment("don't panic");
        assert_eq!(
            build_column_statement(&column),
            r"$table->string('motto')->comment('don\'t panic');"
        );
    }
}
