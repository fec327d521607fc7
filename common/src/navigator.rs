//! スライドナビゲーション
//!
//! 現在位置と遷移方向を持つ状態機械。範囲外への移動は無視する（折り返しなし）。

/// 直前の遷移方向（アニメーションの向きに使う）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    Backward,
    #[default]
    Still,
    Forward,
}

impl Direction {
    /// from → to の符号
    fn between(from: usize, to: usize) -> Self {
        match to.cmp(&from) {
            std::cmp::Ordering::Less => Direction::Backward,
            std::cmp::Ordering::Equal => Direction::Still,
            std::cmp::Ordering::Greater => Direction::Forward,
        }
    }
}

/// 1枚単位の移動
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Previous,
    Next,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigator {
    current: usize,
    len: usize,
    direction: Direction,
}

impl Navigator {
    /// 先頭スライドから開始
    pub fn new(len: usize) -> Self {
        Self {
            current: 0,
            len,
            direction: Direction::Still,
        }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// 1枚進む/戻る
    ///
    /// 範囲外なら何もせず `false` を返す。
    pub fn advance(&mut self, step: Step) -> bool {
        let target = match step {
            Step::Previous => self.current.checked_sub(1),
            Step::Next => Some(self.current + 1).filter(|&i| i < self.len),
        };

        match target {
            Some(index) => {
                self.direction = match step {
                    Step::Previous => Direction::Backward,
                    Step::Next => Direction::Forward,
                };
                self.current = index;
                true
            }
            None => false,
        }
    }

    /// インジケーターから直接移動
    ///
    /// 同じ位置なら方向は `Still`。範囲外のインデックスは無視。
    pub fn jump_to(&mut self, index: usize) -> bool {
        if index >= self.len {
            return false;
        }
        self.direction = Direction::between(self.current, index);
        self.current = index;
        true
    }

    pub fn can_previous(&self) -> bool {
        self.current > 0
    }

    pub fn can_next(&self) -> bool {
        self.current + 1 < self.len
    }
}

// ============================================
// 遷移アニメーション
// ============================================

/// 入場/退場の水平オフセット(px)
pub const TRANSITION_OFFSET_PX: i32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub enter_x: i32,
    pub exit_x: i32,
}

impl Transition {
    /// 進む時は右から入って左へ抜ける。戻る時はその逆。
    pub fn for_direction(direction: Direction) -> Self {
        let enter_x = if direction == Direction::Forward {
            TRANSITION_OFFSET_PX
        } else {
            -TRANSITION_OFFSET_PX
        };
        let exit_x = if direction == Direction::Backward {
            TRANSITION_OFFSET_PX
        } else {
            -TRANSITION_OFFSET_PX
        };
        Self { enter_x, exit_x }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_zero() {
        let nav = Navigator::new(10);
        assert_eq!(nav.current(), 0);
        assert_eq!(nav.direction(), Direction::Still);
        assert!(!nav.can_previous());
        assert!(nav.can_next());
    }

    #[test]
    fn test_next_and_previous() {
        let mut nav = Navigator::new(10);
        assert!(nav.advance(Step::Next));
        assert_eq!(nav.current(), 1);
        assert_eq!(nav.direction(), Direction::Forward);

        assert!(nav.advance(Step::Previous));
        assert_eq!(nav.current(), 0);
        assert_eq!(nav.direction(), Direction::Backward);
    }

    #[test]
    fn test_previous_at_first_is_noop() {
        let mut nav = Navigator::new(10);
        nav.jump_to(3);
        nav.jump_to(0);
        let before = nav.clone();
        assert!(!nav.advance(Step::Previous));
        assert_eq!(nav, before);
    }

    #[test]
    fn test_next_at_last_is_noop() {
        let mut nav = Navigator::new(10);
        nav.jump_to(9);
        assert!(!nav.can_next());
        assert!(!nav.advance(Step::Next));
        assert_eq!(nav.current(), 9);
        assert_eq!(nav.direction(), Direction::Forward);
    }

    #[test]
    fn test_jump_sets_direction_by_sign() {
        let mut nav = Navigator::new(10);
        nav.jump_to(5);
        assert_eq!(nav.direction(), Direction::Forward);
        nav.jump_to(2);
        assert_eq!(nav.direction(), Direction::Backward);
        nav.jump_to(2);
        assert_eq!(nav.direction(), Direction::Still);
    }

    #[test]
    fn test_jump_out_of_range_ignored() {
        let mut nav = Navigator::new(10);
        nav.jump_to(4);
        assert!(!nav.jump_to(10));
        assert_eq!(nav.current(), 4);
        assert_eq!(nav.direction(), Direction::Forward);
    }

    #[test]
    fn test_index_stays_in_bounds_under_any_sequence() {
        let mut nav = Navigator::new(3);
        let steps = [Step::Next, Step::Next, Step::Next, Step::Next, Step::Previous, Step::Previous, Step::Previous, Step::Previous];
        for step in steps {
            nav.advance(step);
            assert!(nav.current() < nav.len());
        }
        assert_eq!(nav.current(), 0);
    }

    #[test]
    fn test_transition_offsets() {
        let forward = Transition::for_direction(Direction::Forward);
        assert_eq!((forward.enter_x, forward.exit_x), (1000, -1000));
        let backward = Transition::for_direction(Direction::Backward);
        assert_eq!((backward.enter_x, backward.exit_x), (-1000, 1000));
        let still = Transition::for_direction(Direction::Still);
        assert_eq!((still.enter_x, still.exit_x), (-1000, -1000));
    }
}
