//! Initialize a new blog

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::content::loader::MANIFEST_PATH;
use crate::CONFIG_FILE;

const CONFIG_TEMPLATE: &str = r#"# Site
title: Leguan's Blog
subtitle: Digest your emotions
description: ''
author: Leguan
language: zh-CN
timezone: Asia/Shanghai

# URL
root: /

# Directory
source_dir: public

# Writing
excerpt_length: 200
highlight:
  theme: base16-ocean.dark
"#;

const MANIFEST_TEMPLATE: &str = r#"[
  {
    "slug": "welcome",
    "title": "欢迎来到 Leguan's Blog",
    "date": "2026-02-04",
    "tags": ["博客", "生活"],
    "categories": ["随笔"]
  }
]
"#;

const WELCOME_TEMPLATE: &str = r#"---
title: 欢迎来到 Leguan's Blog
---
# 欢迎！

这是我的第一篇博客文章。

<!-- more -->

## 关于这个博客

**Digest your emotions** - 消化你的情绪。

我是 Leguan，一个想要看看世界的人。
"#;

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    let source_dir = target_dir.join("public");
    fs::create_dir_all(source_dir.join("posts"))?;
    fs::create_dir_all(source_dir.join("img"))?;

    write_if_missing(&target_dir.join(CONFIG_FILE), CONFIG_TEMPLATE)?;
    write_if_missing(&source_dir.join(MANIFEST_PATH), MANIFEST_TEMPLATE)?;
    write_if_missing(&source_dir.join("posts/welcome.md"), WELCOME_TEMPLATE)?;

    Ok(())
}

/// Never overwrite a file the user already has
fn write_if_missing(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        tracing::info!("Keeping existing {:?}", path);
        return Ok(());
    }
    fs::write(path, content)?;
    tracing::debug!("Created {:?}", path);
    Ok(())
}
