#[derive(Clone, Debug, PartialEq, Eq, sqlx::FromRow)]
pub struct ColumnDescriptor {
    pub column_name: String,
    /// As declared in the schema, e.g. `timestamp without time zone`
    pub data_type: String,
    /// Internal type name, e.g. `int4`, `_numeric` for arrays
    pub udt_name: String,
    /// `YES` or `NO`, straight from `information_schema`
    pub is_nullable: String,
}

impl ColumnDescriptor {
    pub fn nullable(&self) -> bool {
        self.is_nullable == "YES"
    }
}
