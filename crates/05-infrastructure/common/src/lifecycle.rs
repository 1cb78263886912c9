//! 装配生命周期状态

/// 注解装配的生命周期状态
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WiringState {
    /// 未配置扫描包，所有钩子均为空操作
    #[default]
    Unstarted,
    /// 正在处理容器中的对象
    Active,
    /// 已执行关闭，不再处理新对象
    ShuttingDown,
}

impl WiringState {
    /// 是否处理容器中的对象
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state_is_unstarted() {
        let state = WiringState::default();
        assert_eq!(state, WiringState::Unstarted);
        assert!(!state.is_active());
        assert!(WiringState::Active.is_active());
        assert!(!WiringState::ShuttingDown.is_active());
    }
}
