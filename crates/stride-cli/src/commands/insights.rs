//! Insight display command

use anyhow::Result;

use stride_core::db::Database;
use stride_core::insights::{AnalysisContext, InsightEngine, InsightRequest};

pub async fn cmd_insights(
    db: &Database,
    user_id: i64,
    limit: usize,
    all: bool,
    json: bool,
) -> Result<()> {
    let engine = InsightEngine::new();
    let ctx = AnalysisContext::for_today(db, user_id);
    let request = if all {
        InsightRequest::all()
    } else {
        InsightRequest::with_limit(limit)
    };

    let insights = engine.generate(&ctx, &request).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&insights)?);
        return Ok(());
    }

    if insights.is_empty() {
        println!("No insights yet — log a few days of expenses first.");
        return Ok(());
    }

    println!("💡 Insights ({})", insights.len());
    println!();
    for insight in &insights {
        println!("{} {} [{}]", insight.icon, insight.title, insight.kind);
        println!("   {}", insight.message);
        println!("   💬 {}", insight.tip);
        println!();
    }

    Ok(())
}
