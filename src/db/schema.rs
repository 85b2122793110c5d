#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    name: String,
    sql_type: String,
    primary_key: bool,
    nullable: bool,
    default: Option<String>,
}

impl ColumnDef {
    pub fn new(name: &str, sql_type: &str) -> Self {
        Self {
            name: name.to_string(),
            sql_type: sql_type.to_string(),
            primary_key: false,
            nullable: true,
            default: None,
        }
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self.nullable = false;
        self
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// Raw SQL expression, e.g. `TRUE` or `NOW()`.
    pub fn default_sql(mut self, expr: &str) -> Self {
        self.default = Some(expr.to_string());
        self
    }

    fn render(&self) -> String {
        let mut sql = format!("{} {}", quote_ident(&self.name), self.sql_type);
        if self.primary_key {
            sql.push_str(" PRIMARY KEY");
        } else if !self.nullable {
            sql.push_str(" NOT NULL");
        }
        if let Some(expr) = &self.default {
            sql.push_str(" DEFAULT ");
            sql.push_str(expr);
        }
        sql
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct UniqueConstraint {
    name: String,
    columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDef {
    name: String,
    columns: Vec<ColumnDef>,
    uniques: Vec<UniqueConstraint>,
}

impl TableDef {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            columns: Vec::new(),
            uniques: Vec::new(),
        }
    }

    pub fn column(mut self, column: ColumnDef) -> Self {
        self.columns.push(column);
        self
    }

    pub fn unique(mut self, constraint: &str, columns: &[&str]) -> Self {
        self.uniques.push(UniqueConstraint {
            name: constraint.to_string(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
        });
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn create_sql(&self) -> String {
        let mut parts: Vec<String> = self.columns.iter().map(ColumnDef::render).collect();
        for u in &self.uniques {
            let cols: Vec<String> = u.columns.iter().map(|c| quote_ident(c)).collect();
            parts.push(format!(
                "CONSTRAINT {} UNIQUE ({})",
                quote_ident(&u.name),
                cols.join(", ")
            ));
        }
        format!(
            "CREATE TABLE IF NOT EXISTS {} ({})",
            quote_ident(&self.name),
            parts.join(", ")
        )
    }

    pub fn drop_sql(&self) -> String {
        format!("DROP TABLE IF EXISTS {}", quote_ident(&self.name))
    }
}

/// Ordered catalog of tables. Creation follows declaration order, dropping reverses it.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    tables: Vec<TableDef>,
}

impl SchemaRegistry {
    /// A table already registered under the same name is replaced in place.
    pub fn register(&mut self, table: TableDef) {
        match self.tables.iter_mut().find(|t| t.name == table.name) {
            Some(existing) => *existing = table,
            None => self.tables.push(table),
        }
    }

    pub fn names(&self) -> Vec<String> {
        self.tables.iter().map(|t| t.name.clone()).collect()
    }

    pub fn create_statements(&self) -> Vec<String> {
        self.tables.iter().map(TableDef::create_sql).collect()
    }

    pub fn drop_statements(&self) -> Vec<String> {
        self.tables.iter().rev().map(TableDef::drop_sql).collect()
    }
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(name: &str) -> TableDef {
        TableDef::new(name)
            .column(ColumnDef::new("id", "SERIAL").primary_key())
            .column(ColumnDef::new("label", "TEXT").not_null())
            .column(ColumnDef::new("flag", "BOOLEAN").not_null().default_sql("TRUE"))
            .column(ColumnDef::new("note", "TEXT"))
            .unique("uq_sample_label", &["label"])
    }

    #[test]
    fn renders_create_statement() {
        assert_eq!(
            sample("things").create_sql(),
            "CREATE TABLE IF NOT EXISTS \"things\" (\"id\" SERIAL PRIMARY KEY, \
             \"label\" TEXT NOT NULL, \"flag\" BOOLEAN NOT NULL DEFAULT TRUE, \
             \"note\" TEXT, CONSTRAINT \"uq_sample_label\" UNIQUE (\"label\"))"
        );
    }

    #[test]
    fn renders_drop_statement() {
        assert_eq!(sample("things").drop_sql(), "DROP TABLE IF EXISTS \"things\"");
    }

    #[test]
    fn quotes_embedded_quotes() {
        assert_eq!(quote_ident("we\"ird"), "\"we\"\"ird\"");
    }

    #[test]
    fn registry_keeps_order_and_replaces_by_name() {
        let mut registry = SchemaRegistry::default();
        registry.register(sample("a"));
        registry.register(sample("b"));
        registry.register(TableDef::new("a").column(ColumnDef::new("id", "SERIAL").primary_key()));

        assert_eq!(registry.names(), vec!["a", "b"]);
        assert_eq!(
            registry.create_statements()[0],
            "CREATE TABLE IF NOT EXISTS \"a\" (\"id\" SERIAL PRIMARY KEY)"
        );
        assert_eq!(
            registry.drop_statements(),
            vec!["DROP TABLE IF EXISTS \"b\"", "DROP TABLE IF EXISTS \"a\""]
        );
    }
}
