use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Arg, ArgAction, Command};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

use gallery_common::validate_compressed_data;
use gallery_core::builder::CollectionBuilder;

/// 页面读取的JSON数据文件名
const JSON_OUTPUT: &str = "extracted_prompts.json";
/// 压缩快照文件名
const SNAPSHOT_OUTPUT: &str = "gallery_index.bin";

// 主函数
fn main() {
    let matches = Command::new("图库数据生成器")
        .version(env!("CARGO_PKG_VERSION"))
        .about("整理评测数据，生成图库页面使用的数据文件")
        .arg(Arg::new("source")
            .short('s')
            .long("source")
            .value_name("SOURCE")
            .help("原始评测数据文件或目录")
            .required(true))
        .arg(Arg::new("output")
            .short('o')
            .long("output")
            .value_name("OUTPUT_DIR")
            .help("数据输出目录路径")
            .required(true))
        .arg(Arg::new("asset_base")
            .short('b')
            .long("asset-base")
            .value_name("URL")
            .help("相对图片地址 (assets/...) 的前缀"))
        .arg(Arg::new("verbose")
            .short('v')
            .long("verbose")
            .help("显示详细信息")
            .action(ArgAction::SetTrue))
        .get_matches();

    let verbose = matches.get_flag("verbose");
    init_tracing(verbose);

    // source 和 output 都是必填参数
    let source = PathBuf::from(matches.get_one::<String>("source").cloned().unwrap_or_default());
    let output = PathBuf::from(matches.get_one::<String>("output").cloned().unwrap_or_default());
    let asset_base = matches.get_one::<String>("asset_base").cloned();

    if let Err(e) = generate(&source, &output, asset_base) {
        eprintln!("错误: 数据生成失败: {:#}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

// 生成数据文件
fn generate(source: &Path, output: &Path, asset_base: Option<String>) -> Result<()> {
    let start_time = std::time::Instant::now();

    if !source.exists() {
        bail!("源路径不存在: {}", source.display());
    }
    fs::create_dir_all(output)
        .with_context(|| format!("无法创建输出目录 {}", output.display()))?;

    info!(source = %source.display(), output = %output.display(), "开始生成数据");

    let mut builder = match asset_base {
        Some(base) => CollectionBuilder::new().with_asset_base(base),
        None => CollectionBuilder::new(),
    };

    let files = collect_sources(source)?;
    if files.is_empty() {
        bail!("没有找到JSON数据文件");
    }

    let mut skipped_total = 0;
    for file in &files {
        let json = fs::read_to_string(file)
            .with_context(|| format!("无法读取文件 {}", file.display()))?;
        match builder.add_json_array(&json) {
            Ok((added, skipped)) => {
                debug!(file = %file.display(), added, skipped, "文件处理完成");
                skipped_total += skipped;
            }
            Err(e) => warn!(file = %file.display(), error = %e, "跳过无法解析的文件"),
        }
    }

    info!(files = files.len(), items = builder.items().len(), skipped = skipped_total, "扫描完成");

    let json_path = output.join(JSON_OUTPUT);
    let snapshot_path = output.join(SNAPSHOT_OUTPUT);
    builder.save_json(&json_path).context("写入JSON数据失败")?;
    builder.save_snapshot(&snapshot_path).context("写入快照失败")?;

    // 写入后再校验一次快照头部
    let written = fs::read(&snapshot_path)
        .with_context(|| format!("无法读取快照 {}", snapshot_path.display()))?;
    let version = validate_compressed_data(&written).context("快照校验失败")?;

    info!(
        version = %format!("{}.{}", version[0], version[1]),
        elapsed_secs = start_time.elapsed().as_secs_f64(),
        "数据生成完成"
    );
    Ok(())
}

// 单个文件直接返回；目录则递归查找所有 .json 文件
fn collect_sources(source: &Path) -> Result<Vec<PathBuf>> {
    if source.is_file() {
        return Ok(vec![source.to_path_buf()]);
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(source).sort_by_file_name() {
        let entry = entry.context("遍历目录时出错")?;
        let is_json = entry.path().extension().map_or(false, |ext| ext == "json");
        if entry.file_type().is_file() && is_json {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}
