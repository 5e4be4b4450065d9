//! # 进度观察者
//!
//! 被动地观察结果流：每经过一个结果就更新 [`ProgressState`] 并交给
//! [`ProgressSink`] 渲染，结果本身原样、按原顺序继续向下游传递。
//!
//! ## 依赖关系
//! - 观察 `batch/runner.rs` 产出的结果流
//! - 渲染实现位于 `utils/progress.rs`

use crate::models::Outcome;

use std::path::PathBuf;

/// 当前进度
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressState {
    /// 已完成数，单调递增且不超过 `total`
    pub completed: usize,
    pub total: usize,
    pub failed: usize,
    pub last_input: Option<PathBuf>,
    pub last_output: Option<PathBuf>,
}

impl ProgressState {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Default::default()
        }
    }

    fn record(&mut self, outcome: &Outcome) {
        self.completed = (self.completed + 1).min(self.total);
        if outcome.is_failure() {
            self.failed += 1;
        }
        self.last_input = Some(outcome.input().to_path_buf());
        self.last_output = Some(outcome.output().to_path_buf());
    }
}

/// 进度渲染接口
pub trait ProgressSink {
    fn on_start(&mut self, _total: usize) {}

    fn on_outcome(&mut self, state: &ProgressState, outcome: &Outcome);

    fn on_finish(&mut self, _state: &ProgressState) {}
}

impl ProgressSink for Box<dyn ProgressSink> {
    fn on_start(&mut self, total: usize) {
        (**self).on_start(total)
    }

    fn on_outcome(&mut self, state: &ProgressState, outcome: &Outcome) {
        (**self).on_outcome(state, outcome)
    }

    fn on_finish(&mut self, state: &ProgressState) {
        (**self).on_finish(state)
    }
}

/// 进度观察者
pub struct ProgressReporter<S> {
    sink: S,
}

impl<S: ProgressSink> ProgressReporter<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    /// 包装结果流，返回原样转发结果的迭代器
    pub fn observe<I>(mut self, outcomes: I, total: usize) -> Observed<I, S>
    where
        I: Iterator<Item = Outcome>,
    {
        self.sink.on_start(total);
        Observed {
            inner: outcomes,
            sink: self.sink,
            state: ProgressState::new(total),
            finished: false,
        }
    }
}

/// 被观察的结果流
pub struct Observed<I, S> {
    inner: I,
    sink: S,
    state: ProgressState,
    finished: bool,
}

impl<I, S> Iterator for Observed<I, S>
where
    I: Iterator<Item = Outcome>,
    S: ProgressSink,
{
    type Item = Outcome;

    fn next(&mut self) -> Option<Outcome> {
        match self.inner.next() {
            Some(outcome) => {
                self.state.record(&outcome);
                self.sink.on_outcome(&self.state, &outcome);
                Some(outcome)
            }
            None => {
                if !self.finished {
                    self.finished = true;
                    self.sink.on_finish(&self.state);
                }
                None
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::JobError;
    use crate::models::{Job, TransformInfo};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Recorded {
        started: Option<usize>,
        snapshots: Vec<ProgressState>,
        finished: usize,
    }

    struct RecordingSink(Rc<RefCell<Recorded>>);

    impl ProgressSink for RecordingSink {
        fn on_start(&mut self, total: usize) {
            self.0.borrow_mut().started = Some(total);
        }

        fn on_outcome(&mut self, state: &ProgressState, _outcome: &Outcome) {
            self.0.borrow_mut().snapshots.push(state.clone());
        }

        fn on_finish(&mut self, _state: &ProgressState) {
            self.0.borrow_mut().finished += 1;
        }
    }

    fn job(i: usize) -> Job {
        Job {
            index: i,
            input: PathBuf::from(format!("{}.jpg", i)),
            output: PathBuf::from(format!("{}.png", i)),
        }
    }

    fn outcomes() -> Vec<Outcome> {
        vec![
            Outcome::success(job(2), TransformInfo::new(10)),
            Outcome::failure(job(0), JobError::UnsupportedFormat("x".to_string())),
            Outcome::success(job(1), TransformInfo::new(20)),
        ]
    }

    #[test]
    fn test_passes_outcomes_through_unchanged() {
        let recorded = Rc::new(RefCell::new(Recorded::default()));
        let reporter = ProgressReporter::new(RecordingSink(Rc::clone(&recorded)));

        let seen: Vec<PathBuf> = reporter
            .observe(outcomes().into_iter(), 3)
            .map(|o| o.input().to_path_buf())
            .collect();

        assert_eq!(
            seen,
            vec![
                PathBuf::from("2.jpg"),
                PathBuf::from("0.jpg"),
                PathBuf::from("1.jpg")
            ]
        );
    }

    #[test]
    fn test_progress_is_monotonic_and_bounded() {
        let recorded = Rc::new(RefCell::new(Recorded::default()));
        let reporter = ProgressReporter::new(RecordingSink(Rc::clone(&recorded)));
        let mut observed = reporter.observe(outcomes().into_iter(), 3);
        while observed.next().is_some() {}
        // 再次调用不会重复触发 on_finish
        assert!(observed.next().is_none());

        let recorded = recorded.borrow();
        assert_eq!(recorded.started, Some(3));
        assert_eq!(recorded.finished, 1);

        let completed: Vec<usize> = recorded.snapshots.iter().map(|s| s.completed).collect();
        assert_eq!(completed, vec![1, 2, 3]);
        assert_eq!(recorded.snapshots[1].failed, 1);
        assert_eq!(
            recorded.snapshots[2].last_output,
            Some(PathBuf::from("1.png"))
        );
    }

    #[test]
    fn test_completed_never_exceeds_total() {
        let recorded = Rc::new(RefCell::new(Recorded::default()));
        let reporter = ProgressReporter::new(RecordingSink(Rc::clone(&recorded)));
        let observed = reporter.observe(outcomes().into_iter(), 2);
        assert_eq!(observed.count(), 3);
        assert!(recorded.borrow().snapshots.iter().all(|s| s.completed <= 2));
    }
}
