//! # 示例应用程序
//!
//! 演示 Vessel 生命周期引擎：条件激活、回收动作解析与容器统一关闭。

use anyhow::Result;
use clap::Parser;
use lifecycle_common::{CloseableResource, Environment, HasTeardownShape, MethodShape, TypeShape};
use lifecycle_composition::{ContainerBuilder, LifecycleContainer, ManagedInstance};
use lifecycle_impl::OnFactPresent;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{info, warn};

/// 命令行参数
#[derive(Parser, Debug)]
#[command(name = "example-app")]
#[command(about = "Vessel 生命周期引擎示例应用")]
struct Args {
    /// 是否激活实验性诊断探针绑定
    #[arg(long)]
    experimental: bool,

    /// 日志级别
    #[arg(long, default_value = "info")]
    log_level: String,
}

/// 模拟的数据库连接池
#[derive(Debug, Default)]
struct ConnectionPool {
    active_connections: AtomicUsize,
}

impl ConnectionPool {
    fn acquire(&self) {
        self.active_connections.fetch_add(1, Ordering::SeqCst);
    }

    fn shutdown(&self) {
        let drained = self.active_connections.swap(0, Ordering::SeqCst);
        info!("连接池已排空 {} 个连接", drained);
    }
}

impl HasTeardownShape for ConnectionPool {
    fn teardown_shape() -> TypeShape {
        TypeShape::of::<Self>()
            .with_method(MethodShape::marked("shutdown").with_body::<Self, _>(Self::shutdown))
    }
}

/// 模拟的指标缓冲区，遵循内建关闭协议
#[derive(Debug, Default)]
struct MetricsBuffer;

impl CloseableResource for MetricsBuffer {
    fn close(&self) -> std::result::Result<(), Box<dyn std::error::Error + Send + Sync>> {
        info!("指标缓冲区已刷写");
        Ok(())
    }
}

impl HasTeardownShape for MetricsBuffer {
    fn teardown_shape() -> TypeShape {
        TypeShape::of::<Self>().with_close_protocol::<Self>()
    }
}

/// 实验性诊断探针
#[derive(Debug, Default)]
struct DiagnosticProbe;

impl HasTeardownShape for DiagnosticProbe {
    fn teardown_shape() -> TypeShape {
        TypeShape::of::<Self>().with_method(MethodShape::marked("detach").with_body::<Self, _>(
            |_probe| {
                info!("诊断探针已卸载");
            },
        ))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // 初始化日志
    tracing_subscriber::fmt()
        .with_max_level(parse_log_level(&args.log_level))
        .init();

    info!("启动 Vessel 示例应用");

    // 构建容器
    let container = build_container(&args).await?;

    // 演示受管实例的使用
    demonstrate_usage(&container);

    // 关闭容器并检视报告
    info!("正在关闭容器");
    let report = container.close().await;
    if report.is_clean() {
        info!("容器关闭完成，没有失败的回收动作");
    } else {
        for failure in report.failures() {
            warn!("{}", failure);
        }
    }

    info!("应用已退出");
    Ok(())
}

/// 构建容器
async fn build_container(args: &Args) -> Result<LifecycleContainer> {
    info!("构建生命周期容器");

    // 环境描述符：进程快照 + VESSEL_ 前缀环境变量 + 命令行开关
    let mut environment = Environment::detect().with_process_vars("VESSEL");
    if args.experimental {
        environment = environment.with_flag("probe.enabled");
    }

    let container = ContainerBuilder::new()
        .with_environment(environment)
        .register_instance(
            "connection_pool",
            ManagedInstance::of(ConnectionPool::default()),
        )
        .register_provider("metrics_buffer", || Ok(ManagedInstance::of(MetricsBuffer)))
        .register_guarded_provider(
            "diagnostic_probe",
            OnFactPresent::new("probe.enabled"),
            || Ok(ManagedInstance::of(DiagnosticProbe)),
        )
        .build()
        .await?;

    info!(
        "容器构建完成: {} 个活动绑定, 剪除 {:?}",
        container.managed_count(),
        container.pruned_bindings()
    );
    Ok(container)
}

/// 演示受管实例的使用
fn demonstrate_usage(container: &LifecycleContainer) {
    if let Some(pool) = container.instance_of::<ConnectionPool>("connection_pool") {
        pool.acquire();
        pool.acquire();
        info!("连接池使用中");
    }

    if container.has_binding("diagnostic_probe") {
        info!("诊断探针已激活");
    } else {
        info!("诊断探针未激活（使用 --experimental 开启）");
    }
}

/// 解析日志级别
fn parse_log_level(level: &str) -> tracing::Level {
    match level.to_lowercase().as_str() {
        "trace" => tracing::Level::TRACE,
        "debug" => tracing::Level::DEBUG,
        "warn" => tracing::Level::WARN,
        "error" => tracing::Level::ERROR,
        _ => tracing::Level::INFO,
    }
}
