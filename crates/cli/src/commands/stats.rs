use nplus1_orm::{table_counts, DatabasePool};

use crate::report;

pub async fn run(pool: &dyn DatabasePool) -> anyhow::Result<()> {
    println!("🗄️  Table statistics");
    println!("===================");
    print!("{}", report::render_table_counts(&table_counts(pool).await));
    Ok(())
}
