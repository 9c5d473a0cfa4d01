//! 程序入口：初始化日志，加载JSON文件并输出一次性的树状视图

use std::path::Path;

use anyhow::Context;
use tracing_subscriber::fmt::SubscriberBuilder;

use json_shu_liulanqi::model::data_core::AppState;

fn main() -> anyhow::Result<()> {
    // 初始化日志输出
    let _ = SubscriberBuilder::default()
        .with_max_level(tracing::Level::INFO)
        .try_init();

    let path = std::env::args()
        .nth(1)
        .context("用法: json_shu_liulanqi <文件.json>")?;

    let mut state = AppState::default();
    state
        .load_file(Path::new(&path))
        .with_context(|| format!("加载文件失败: {}", path))?;

    println!("{}", state.status_line());
    let tree = state.tree.as_ref().context("展示树未构建")?;
    for id in tree.collect_visible() {
        println!("{}{}", tree.build_prefix(id), state.node_label(id)?);
    }
    Ok(())
}
