//! 内建条件谓词
//!
//! 引擎自带的常用谓词实现。求值器对任意谓词实现保持开放，
//! 这里只是覆盖最常见的场景：环境事实存在性、事实取值比较，
//! 以及两个具体的测试执行框架探测。

use lifecycle_abstractions::ConditionPredicate;
use lifecycle_common::{facts, ConditionResult, Environment};

/// 环境事实存在性谓词
#[derive(Debug, Clone)]
pub struct OnFactPresent {
    fact: String,
    description: String,
}

impl OnFactPresent {
    /// 创建检查指定事实存在的谓词
    pub fn new(fact: impl Into<String>) -> Self {
        let fact = fact.into();
        Self {
            description: format!("环境事实存在: {fact}"),
            fact,
        }
    }
}

impl ConditionPredicate for OnFactPresent {
    fn describe(&self) -> &str {
        &self.description
    }

    fn evaluate(&self, environment: &Environment) -> ConditionResult<bool> {
        Ok(environment.has_fact(&self.fact))
    }
}

/// 环境事实取值谓词
///
/// 事实缺失按不匹配处理，不算求值失败。
#[derive(Debug, Clone)]
pub struct OnFactEquals {
    fact: String,
    expected: String,
    description: String,
}

impl OnFactEquals {
    /// 创建检查事实取值的谓词
    pub fn new(fact: impl Into<String>, expected: impl Into<String>) -> Self {
        let fact = fact.into();
        let expected = expected.into();
        Self {
            description: format!("环境事实 {fact} = {expected}"),
            fact,
            expected,
        }
    }
}

impl ConditionPredicate for OnFactEquals {
    fn describe(&self) -> &str {
        &self.description
    }

    fn evaluate(&self, environment: &Environment) -> ConditionResult<bool> {
        Ok(environment.fact(&self.fact) == Some(self.expected.as_str()))
    }
}

/// cargo 测试执行框架探测谓词
#[derive(Debug, Clone, Copy, Default)]
pub struct OnCargoTest;

impl ConditionPredicate for OnCargoTest {
    fn describe(&self) -> &str {
        "cargo 测试执行框架存在"
    }

    fn evaluate(&self, environment: &Environment) -> ConditionResult<bool> {
        Ok(environment.has_fact(facts::CARGO_HARNESS))
    }
}

/// cargo-nextest 运行器探测谓词
#[derive(Debug, Clone, Copy, Default)]
pub struct OnNextest;

impl ConditionPredicate for OnNextest {
    fn describe(&self) -> &str {
        "cargo-nextest 运行器存在"
    }

    fn evaluate(&self, environment: &Environment) -> ConditionResult<bool> {
        Ok(environment.has_fact(facts::NEXTEST_HARNESS))
    }
}
