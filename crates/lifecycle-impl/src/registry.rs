//! 回收注册表实现

use async_trait::async_trait;
use lifecycle_abstractions::{RecordState, ShutdownRegistry};
use lifecycle_common::{RetirementFailure, ShutdownAction, TypeInfo};
use std::any::Any;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 受管实例记录
struct ManagedRecord {
    /// 实例句柄
    instance: Arc<dyn Any + Send + Sync>,
    /// 实例类型信息
    type_info: TypeInfo,
    /// 有序动作列表
    actions: Vec<ShutdownAction>,
    /// 记录状态
    state: RecordState,
    /// 登记时间
    registered_at: chrono::DateTime<chrono::Utc>,
}

impl ManagedRecord {
    /// 依序执行记录的动作并捕获失败
    ///
    /// 执行前转入 Retiring，完成后转入 Retired；
    /// 单个动作失败不影响同记录的剩余动作。
    fn run_actions(&mut self) -> Vec<RetirementFailure> {
        self.state = RecordState::Retiring;
        debug!(
            "回收实例: {} (登记于 {})",
            self.type_info.name, self.registered_at
        );
        let mut failures = Vec::new();

        for action in &self.actions {
            debug!(
                "执行回收动作: {}::{}",
                self.type_info.name,
                action.name()
            );
            if let Err(error) = action.invoke(self.instance.as_ref()) {
                warn!(
                    "回收动作失败: {}::{}, 原因: {}",
                    self.type_info.name,
                    action.name(),
                    error
                );
                failures.push(RetirementFailure {
                    type_info: self.type_info.clone(),
                    action: action.name().to_string(),
                    kind: action.kind(),
                    error,
                });
            }
        }

        self.state = RecordState::Retired;
        failures
    }
}

/// 以 Arc 指针作为实例身份
fn instance_key(instance: &Arc<dyn Any + Send + Sync>) -> usize {
    Arc::as_ptr(instance) as *const () as usize
}

/// 容器内回收注册表
///
/// 按登记顺序保存受管记录；回收顺序即登记（构造）顺序。
/// 注册表随容器创建、随容器关闭废弃，不跨容器复用。
pub struct InMemoryShutdownRegistry {
    records: tokio::sync::Mutex<Vec<ManagedRecord>>,
}

impl InMemoryShutdownRegistry {
    /// 创建新的回收注册表
    pub fn new() -> Self {
        Self {
            records: tokio::sync::Mutex::new(Vec::new()),
        }
    }
}

impl Default for InMemoryShutdownRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ShutdownRegistry for InMemoryShutdownRegistry {
    async fn register(
        &self,
        instance: Arc<dyn Any + Send + Sync>,
        type_info: TypeInfo,
        actions: Vec<ShutdownAction>,
    ) {
        let key = instance_key(&instance);
        let mut records = self.records.lock().await;

        if let Some(record) = records
            .iter_mut()
            .find(|record| instance_key(&record.instance) == key)
        {
            match record.state {
                RecordState::Pending => {
                    debug!("替换待回收记录的动作列表: {}", type_info.name);
                    record.type_info = type_info;
                    record.actions = actions;
                }
                RecordState::Retiring | RecordState::Retired => {
                    warn!("实例已进入回收流程，忽略重复注册: {}", type_info.name);
                }
            }
            return;
        }

        info!(
            "登记受管实例: {} ({} 个回收动作)",
            type_info.name,
            actions.len()
        );
        records.push(ManagedRecord {
            instance,
            type_info,
            actions,
            state: RecordState::Pending,
            registered_at: chrono::Utc::now(),
        });
    }

    async fn retire(&self, instance: &Arc<dyn Any + Send + Sync>) -> Vec<RetirementFailure> {
        let key = instance_key(instance);
        let mut records = self.records.lock().await;

        match records
            .iter_mut()
            .find(|record| instance_key(&record.instance) == key)
        {
            Some(record) if record.state == RecordState::Pending => record.run_actions(),
            Some(record) => {
                debug!("实例已回收，忽略重复请求: {}", record.type_info.name);
                Vec::new()
            }
            None => Vec::new(),
        }
    }

    async fn retire_all(&self) -> Vec<RetirementFailure> {
        let mut records = self.records.lock().await;
        let mut failures = Vec::new();
        let mut retired = 0usize;

        for record in records.iter_mut() {
            if record.state != RecordState::Pending {
                continue;
            }
            failures.extend(record.run_actions());
            retired += 1;
        }

        info!("回收完成: {} 个实例, {} 个动作失败", retired, failures.len());
        failures
    }

    fn managed_count(&self) -> usize {
        self.records
            .try_lock()
            .map(|records| records.len())
            .unwrap_or(0)
    }

    fn is_managed(&self, instance: &Arc<dyn Any + Send + Sync>) -> bool {
        let key = instance_key(instance);
        self.records
            .try_lock()
            .map(|records| {
                records
                    .iter()
                    .any(|record| instance_key(&record.instance) == key)
            })
            .unwrap_or(false)
    }
}
