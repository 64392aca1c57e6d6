use crate::error::{EtlError, EtlResult};
use rusqlite::{params, Connection};

#[macro_export]
macro_rules! sqlite_column {
    ($name:expr, $sql_type:expr $(, $field:ident = $value:expr)*) => {
        {
            // Only mutated when optional field assignments are passed
            #[allow(unused_mut)]
            let mut column = Column {
                name: $name,
                sql_type: $sql_type,
                is_primary_key: false,
                non_null: false,
                foreign_key: None,
            };
            $(
                column.$field = $value;
            )*
            column
        }
    };
}

#[derive(Debug, PartialEq, Eq)]
pub enum SqlType {
    Text,
    Integer,
    Real,
}

impl SqlType {
    fn as_sql(&self) -> &'static str {
        match self {
            SqlType::Text => "TEXT",
            SqlType::Integer => "INTEGER",
            SqlType::Real => "REAL",
        }
    }

    fn from_sql(s: &str) -> Option<&'static SqlType> {
        match s {
            "TEXT" => Some(&SqlType::Text),
            "INTEGER" => Some(&SqlType::Integer),
            "REAL" => Some(&SqlType::Real),
            _ => None,
        }
    }
}

pub struct ForeignKey {
    pub foreign_table: &'static str,
    pub foreign_column: &'static str,
}

pub struct Column {
    pub name: &'static str,
    pub sql_type: &'static SqlType,
    pub is_primary_key: bool,
    pub non_null: bool,
    pub foreign_key: Option<&'static ForeignKey>,
}

/// What an insert does when its conflict key already exists.
#[derive(Debug, PartialEq, Eq)]
pub enum ConflictAction {
    /// Keep the stored row.
    Ignore,
    /// Overwrite only the listed columns with the incoming values.
    Update(&'static [&'static str]),
}

/// Declarative description of one target table.
///
/// The DDL and the upsert statement are both generated from this, so the
/// column order of `columns` is also the parameter order of `insert_sql`.
pub struct Table {
    pub name: &'static str,
    pub columns: &'static [Column],
    pub conflict_key: &'static str,
    pub on_conflict: ConflictAction,
}

impl Table {
    pub fn arity(&self) -> usize {
        self.columns.len()
    }

    pub fn create_sql(&self) -> String {
        let mut create_sql = format!("CREATE TABLE IF NOT EXISTS \"{}\" (", self.name);
        for (column_index, column) in self.columns.iter().enumerate() {
            if column_index > 0 {
                create_sql.push_str(", ");
            }
            create_sql.push_str(&format!("{} {}", column.name, column.sql_type.as_sql()));
            if column.is_primary_key {
                create_sql.push_str(" PRIMARY KEY");
            }
            if column.non_null {
                create_sql.push_str(" NOT NULL");
            }
            if let Some(foreign_key) = column.foreign_key {
                create_sql.push_str(&format!(
                    " REFERENCES \"{}\"({})",
                    foreign_key.foreign_table, foreign_key.foreign_column
                ));
            }
        }
        create_sql.push_str(");");
        create_sql
    }

    pub fn drop_sql(&self) -> String {
        format!("DROP TABLE IF EXISTS \"{}\";", self.name)
    }

    /// Parameterized upsert with the table's conflict policy baked in.
    pub fn insert_sql(&self) -> String {
        let names = self
            .columns
            .iter()
            .map(|c| c.name)
            .collect::<Vec<_>>()
            .join(", ");
        let placeholders = (1..=self.arity())
            .map(|i| format!("?{}", i))
            .collect::<Vec<_>>()
            .join(", ");
        let action = match self.on_conflict {
            ConflictAction::Ignore => "DO NOTHING".to_string(),
            ConflictAction::Update(columns) => format!(
                "DO UPDATE SET {}",
                columns
                    .iter()
                    .map(|c| format!("{c} = excluded.{c}"))
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        };
        format!(
            "INSERT INTO \"{}\" ({}) VALUES ({}) ON CONFLICT({}) {}",
            self.name, names, placeholders, self.conflict_key, action
        )
    }

    pub fn create(&self, conn: &Connection) -> EtlResult<()> {
        conn.execute(&self.create_sql(), params![])?;
        Ok(())
    }

    pub fn drop(&self, conn: &Connection) -> EtlResult<()> {
        conn.execute(&self.drop_sql(), params![])?;
        Ok(())
    }

    pub fn count(&self, conn: &Connection) -> EtlResult<i64> {
        let count = conn.query_row(
            &format!("SELECT COUNT(*) FROM \"{}\"", self.name),
            [],
            |r| r.get(0),
        )?;
        Ok(count)
    }

    /// Checks the stored table against this definition: column names and
    /// order, types, NOT NULL, primary key and foreign keys.
    pub fn validate(&self, conn: &Connection) -> EtlResult<()> {
        struct ActualColumn {
            name: String,
            sql_type: String,
            non_null: bool,
            is_primary_key: bool,
        }

        let mut stmt = conn.prepare(&format!("PRAGMA table_info(\"{}\");", self.name))?;
        let actual_columns = stmt
            .query_map(params![], |row| {
                Ok(ActualColumn {
                    name: row.get(1)?,
                    sql_type: row.get(2)?,
                    non_null: row.get::<_, i32>(3)? == 1,
                    is_primary_key: row.get::<_, i32>(5)? == 1,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        if actual_columns.len() != self.columns.len() {
            return Err(EtlError::SchemaMismatch(format!(
                "Table {} has {} columns, expected {}. Found column names: {}, expected: {}",
                self.name,
                actual_columns.len(),
                self.columns.len(),
                actual_columns
                    .iter()
                    .map(|c| c.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
                self.columns
                    .iter()
                    .map(|c| c.name)
                    .collect::<Vec<_>>()
                    .join(", ")
            )));
        }

        for (actual, expected) in actual_columns.iter().zip(self.columns.iter()) {
            if actual.name != expected.name {
                return Err(EtlError::SchemaMismatch(format!(
                    "Table {} column name mismatch: expected {}, got {}",
                    self.name, expected.name, actual.name
                )));
            }
            if SqlType::from_sql(&actual.sql_type) != Some(expected.sql_type) {
                return Err(EtlError::SchemaMismatch(format!(
                    "Table {} column {} type mismatch: expected {:?}, got {}",
                    self.name, expected.name, expected.sql_type, actual.sql_type
                )));
            }
            if actual.non_null != expected.non_null {
                return Err(EtlError::SchemaMismatch(format!(
                    "Table {} column {} non-null mismatch: expected {}, got {}",
                    self.name, expected.name, expected.non_null, actual.non_null
                )));
            }
            if actual.is_primary_key != expected.is_primary_key {
                return Err(EtlError::SchemaMismatch(format!(
                    "Table {} column {} primary key mismatch: expected {}, got {}",
                    self.name, expected.name, expected.is_primary_key, actual.is_primary_key
                )));
            }
        }

        // PRAGMA foreign_key_list returns: id, seq, table, from, to, ...
        let mut fk_stmt = conn.prepare(&format!("PRAGMA foreign_key_list(\"{}\")", self.name))?;
        let actual_fks = fk_stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(4)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        for column in self.columns {
            if let Some(expected_fk) = column.foreign_key {
                let found = actual_fks.iter().any(|(from, table, to)| {
                    from == column.name
                        && table == expected_fk.foreign_table
                        && to == expected_fk.foreign_column
                });
                if !found {
                    return Err(EtlError::SchemaMismatch(format!(
                        "Table {} column {} is missing foreign key: expected REFERENCES {}({})",
                        self.name, column.name, expected_fk.foreign_table, expected_fk.foreign_column
                    )));
                }
            }
        }
        Ok(())
    }
}

/// An ordered set of tables. Creation follows the declared order, drops run
/// in reverse so referencing tables go first.
pub struct Schema {
    pub tables: &'static [Table],
}

impl Schema {
    pub fn create(&self, conn: &Connection) -> EtlResult<()> {
        conn.execute("PRAGMA foreign_keys = ON;", params![])?;
        for table in self.tables {
            table.create(conn)?;
        }
        Ok(())
    }

    pub fn drop(&self, conn: &Connection) -> EtlResult<()> {
        for table in self.tables.iter().rev() {
            table.drop(conn)?;
        }
        Ok(())
    }

    pub fn validate(&self, conn: &Connection) -> EtlResult<()> {
        for table in self.tables {
            table.validate(conn)?;
        }
        Ok(())
    }

    pub fn table(&self, name: &str) -> Option<&'static Table> {
        self.tables.iter().find(|t| t.name == name)
    }
}
