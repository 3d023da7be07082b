//! 分组集合与通用分组调用器
//!
//! 负责分组引用的创建、并行引用和关闭，不包含任何重试逻辑

use super::traits::{GroupReference, GroupReferenceFactory, ReferenceOptions};
use crate::config::ConsumerConfig;
use crate::error::RpcError;
use crate::resilience::Route;
use dashmap::DashMap;
use futures::future::{join_all, try_join_all};
use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// 分组集合
///
/// 按配置顺序排列，引用建立后不再变化。
pub struct GroupSet {
    groups: Vec<Arc<dyn GroupReference>>,
}

impl GroupSet {
    /// 创建分组集合，不允许为空
    pub fn new(groups: Vec<Arc<dyn GroupReference>>) -> Result<Self, RpcError> {
        if groups.is_empty() {
            return Err(RpcError::Config("分组集合不能为空".to_string()));
        }
        Ok(Self { groups })
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// 第 attempt 次尝试使用的分组：按位置循环
    pub fn select(&self, attempt: u32) -> &Arc<dyn GroupReference> {
        &self.groups[attempt as usize % self.groups.len()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn GroupReference>> {
        self.groups.iter()
    }

    pub fn aliases(&self) -> Vec<String> {
        self.groups.iter().map(|g| g.alias().to_string()).collect()
    }
}

impl std::fmt::Debug for GroupSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroupSet")
            .field("aliases", &self.aliases())
            .finish()
    }
}

/// 调用器生命周期状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvokerState {
    /// 已创建
    Created,
    /// 已初始化
    SetUp,
    /// 所有分组引用就绪
    Ready,
    /// 已关闭
    Closed,
}

/// 通用分组调用器
///
/// 具体的集群策略组合此结构体，复用分组的引用和关闭流程。
pub struct GroupInvokerBase {
    config: ConsumerConfig,
    factory: Arc<dyn GroupReferenceFactory>,
    alias_adaptive: AtomicBool,
    state: RwLock<InvokerState>,
    groups: OnceCell<Arc<GroupSet>>,
    /// 按别名索引的分组引用，仅用于诊断和管理
    references: DashMap<String, Arc<dyn GroupReference>>,
    refer_lock: tokio::sync::Mutex<()>,
}

impl GroupInvokerBase {
    pub fn new(config: ConsumerConfig, factory: Arc<dyn GroupReferenceFactory>) -> Self {
        let alias_adaptive = config.alias_adaptive;
        Self {
            config,
            factory,
            alias_adaptive: AtomicBool::new(alias_adaptive),
            state: RwLock::new(InvokerState::Created),
            groups: OnceCell::new(),
            references: DashMap::new(),
            refer_lock: tokio::sync::Mutex::new(()),
        }
    }

    pub fn config(&self) -> &ConsumerConfig {
        &self.config
    }

    pub fn state(&self) -> InvokerState {
        *self.state.read()
    }

    pub fn is_ready(&self) -> bool {
        self.state() == InvokerState::Ready
    }

    pub fn alias_adaptive(&self) -> bool {
        self.alias_adaptive.load(Ordering::Relaxed)
    }

    pub fn set_alias_adaptive(&self, alias_adaptive: bool) {
        self.alias_adaptive.store(alias_adaptive, Ordering::Relaxed);
    }

    /// 校验分组配置
    pub fn setup(&self) -> Result<(), RpcError> {
        let mut state = self.state.write();
        match *state {
            InvokerState::Closed => return Err(RpcError::Closed),
            InvokerState::Ready => return Ok(()),
            InvokerState::Created | InvokerState::SetUp => {}
        }
        self.config.validate().map_err(RpcError::Config)?;
        *state = InvokerState::SetUp;
        Ok(())
    }

    /// 为每个别名创建分组引用并并行建立，全部成功后就绪
    ///
    /// 任意一个分组失败时整体失败，已创建的引用会被关闭。
    pub async fn refer_all(&self, route: Route) -> Result<Arc<GroupSet>, RpcError> {
        let _guard = self.refer_lock.lock().await;

        match self.state() {
            InvokerState::Ready => {
                if let Some(groups) = self.groups.get() {
                    return Ok(Arc::clone(groups));
                }
            }
            InvokerState::Created => {
                return Err(RpcError::NotReady("调用器尚未初始化".to_string()))
            }
            InvokerState::Closed => return Err(RpcError::Closed),
            InvokerState::SetUp => {}
        }

        let timeout = Duration::from_millis(self.config.timeout_ms);
        let mut references = Vec::with_capacity(self.config.aliases.len());
        for alias in &self.config.aliases {
            let options = ReferenceOptions {
                interface: self.config.interface.clone(),
                alias: alias.clone(),
                route,
                timeout,
            };
            match self.factory.create(&options) {
                Ok(reference) => references.push(reference),
                Err(e) => {
                    tracing::error!(
                        "[GROUP] 接口 {} 创建分组 {} 引用失败: {}",
                        self.config.interface,
                        alias,
                        e
                    );
                    join_all(references.iter().map(|reference| reference.close(false))).await;
                    return Err(e);
                }
            }
        }

        let refers = references.iter().map(|reference| async move {
            reference.refer().await.map_err(|e| RpcError::Setup {
                alias: reference.alias().to_string(),
                message: e.to_string(),
            })
        });

        if let Err(e) = try_join_all(refers).await {
            tracing::error!("[GROUP] 接口 {} 分组引用失败: {}", self.config.interface, e);
            join_all(references.iter().map(|reference| reference.close(false))).await;
            return Err(e);
        }

        for reference in &references {
            self.references
                .insert(reference.alias().to_string(), Arc::clone(reference));
        }
        let groups = Arc::clone(self.groups.get_or_try_init(|| {
            GroupSet::new(references).map(Arc::new)
        })?);

        let closed = {
            let mut state = self.state.write();
            if *state == InvokerState::Closed {
                true
            } else {
                *state = InvokerState::Ready;
                false
            }
        };
        // 引用期间被关闭
        if closed {
            join_all(groups.iter().map(|group| group.close(false))).await;
            self.references.clear();
            return Err(RpcError::Closed);
        }

        tracing::info!(
            "[GROUP] 接口 {} 引用完成: {} 个分组 {:?}",
            self.config.interface,
            groups.len(),
            groups.aliases()
        );
        Ok(groups)
    }

    /// 就绪后的分组集合
    pub fn groups(&self) -> Option<Arc<GroupSet>> {
        self.groups.get().map(Arc::clone)
    }

    /// 按别名查找分组引用
    pub fn group(&self, alias: &str) -> Option<Arc<dyn GroupReference>> {
        self.references
            .get(alias)
            .map(|entry| Arc::clone(entry.value()))
    }

    /// 分组别名，就绪前返回配置中的别名
    pub fn aliases(&self) -> Vec<String> {
        match self.groups.get() {
            Some(groups) => groups.aliases(),
            None => self.config.aliases.clone(),
        }
    }

    pub fn group_count(&self) -> usize {
        self.groups.get().map(|groups| groups.len()).unwrap_or(0)
    }

    /// 关闭所有分组引用
    ///
    /// 未初始化或未就绪时同样可以调用。所有分组都会尝试关闭，返回第一个错误。
    pub async fn close(&self, gracefully: bool) -> Result<(), RpcError> {
        let previous = std::mem::replace(&mut *self.state.write(), InvokerState::Closed);
        if previous == InvokerState::Closed {
            return Ok(());
        }

        let mut first_error = None;
        if previous == InvokerState::Ready {
            if let Some(groups) = self.groups.get() {
                let results = join_all(groups.iter().map(|group| group.close(gracefully))).await;
                for (group, result) in groups.iter().zip(results) {
                    if let Err(e) = result {
                        tracing::warn!("[GROUP] 关闭分组 {} 失败: {}", group.alias(), e);
                        first_error.get_or_insert(e);
                    }
                }
            }
        }
        self.references.clear();

        tracing::info!("[GROUP] 接口 {} 已关闭", self.config.interface);
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
