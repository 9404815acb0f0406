//! 运行时环境描述符
//!
//! 条件谓词在图构建期消费的环境事实集合。

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 内建环境事实键
pub mod facts {
    /// 进程由 cargo 驱动
    pub const CARGO_HARNESS: &str = "harness.cargo";
    /// 进程由 cargo-nextest 运行器驱动
    pub const NEXTEST_HARNESS: &str = "harness.nextest";
    /// 运行时操作系统
    pub const RUNTIME_OS: &str = "runtime.os";
    /// 运行时处理器架构
    pub const RUNTIME_ARCH: &str = "runtime.arch";
}

/// 进程环境快照，进程内只采集一次
static PROCESS_ENVIRONMENT: Lazy<Environment> = Lazy::new(Environment::capture_process);

/// 运行时环境描述符
///
/// 一组命名事实（键值对），描述当前运行时上下文。
/// 同一描述符在一个容器生命周期内被视为不可变。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    facts: HashMap<String, String>,
}

impl Environment {
    /// 创建空环境
    pub fn new() -> Self {
        Self {
            facts: HashMap::new(),
        }
    }

    /// 获取进程环境快照
    ///
    /// 包含运行时平台事实以及可识别的测试执行框架事实。
    /// 快照在进程内缓存，重复调用返回相同内容。
    pub fn detect() -> Self {
        PROCESS_ENVIRONMENT.clone()
    }

    fn capture_process() -> Self {
        let mut environment = Self::new()
            .with_fact(facts::RUNTIME_OS, std::env::consts::OS)
            .with_fact(facts::RUNTIME_ARCH, std::env::consts::ARCH);

        // cargo 驱动的进程会注入 CARGO 环境变量
        if std::env::var_os("CARGO").is_some() {
            environment = environment.with_flag(facts::CARGO_HARNESS);
        }
        // cargo-nextest 运行器会注入 NEXTEST 环境变量
        if std::env::var_os("NEXTEST").is_some() {
            environment = environment.with_flag(facts::NEXTEST_HARNESS);
        }

        environment
    }

    /// 添加事实
    pub fn with_fact(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.facts.insert(key.into(), value.into());
        self
    }

    /// 添加布尔标志事实
    pub fn with_flag(self, key: impl Into<String>) -> Self {
        self.with_fact(key, "true")
    }

    /// 从进程环境变量导入事实
    ///
    /// 采集所有以 `{prefix}_` 开头的环境变量，
    /// 变量名剩余部分转为小写并以 `.` 分隔作为事实键。
    pub fn with_process_vars(mut self, prefix: &str) -> Self {
        let marker = format!("{prefix}_");
        for (key, value) in std::env::vars() {
            if let Some(rest) = key.strip_prefix(&marker) {
                let fact_key = rest.to_lowercase().replace('_', ".");
                self.facts.insert(fact_key, value);
            }
        }
        self
    }

    /// 检查事实是否存在
    pub fn has_fact(&self, key: &str) -> bool {
        self.facts.contains_key(key)
    }

    /// 获取事实值
    pub fn fact(&self, key: &str) -> Option<&str> {
        self.facts.get(key).map(String::as_str)
    }

    /// 获取事实数量
    pub fn fact_count(&self) -> usize {
        self.facts.len()
    }
}
