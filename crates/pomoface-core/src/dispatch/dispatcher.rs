//! Ordered, de-duplicated callback registry.
//!
//! A [`Dispatcher`] fires every registered [`Callback`] with the same
//! argument on each tick, in registration order. Callbacks are compared by
//! identity: keep a clone of the handle you registered to remove it later.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// What a step callback reports after running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    /// Keep the step registered for the next tick.
    Continue,
    /// The step is finished and is dropped from the registry.
    Done,
}

type FunctionFn<A> = dyn FnMut(&mut A);
type StepFn<A> = dyn FnMut(&mut A) -> StepStatus;

/// A registered unit of work.
pub enum Callback<A> {
    /// Called once per tick for as long as it stays registered.
    Function(Rc<RefCell<FunctionFn<A>>>),
    /// Called once per tick until it reports [`StepStatus::Done`].
    Step(Rc<RefCell<StepFn<A>>>),
}

impl<A: 'static> Callback<A> {
    pub fn function(f: impl FnMut(&mut A) + 'static) -> Self {
        Callback::Function(Rc::new(RefCell::new(f)))
    }

    pub fn step(f: impl FnMut(&mut A) -> StepStatus + 'static) -> Self {
        Callback::Step(Rc::new(RefCell::new(f)))
    }

    /// A step that runs on the next tick only.
    pub fn once(f: impl FnOnce(&mut A) + 'static) -> Self {
        let mut f = Some(f);
        Callback::step(move |args| {
            if let Some(f) = f.take() {
                f(args);
            }
            StepStatus::Done
        })
    }
}

impl<A> Callback<A> {
    /// Run the callback once. Returns `Done` when it should be dropped.
    ///
    /// A callback that is already running further up the stack is skipped.
    fn invoke(&self, args: &mut A) -> StepStatus {
        match self {
            Callback::Function(f) => match f.try_borrow_mut() {
                Ok(mut f) => {
                    f(args);
                    StepStatus::Continue
                }
                Err(_) => {
                    tracing::warn!("skipping re-entrant callback");
                    StepStatus::Continue
                }
            },
            Callback::Step(f) => match f.try_borrow_mut() {
                Ok(mut f) => f(args),
                Err(_) => {
                    tracing::warn!("skipping re-entrant step callback");
                    StepStatus::Continue
                }
            },
        }
    }
}

impl<A> Clone for Callback<A> {
    fn clone(&self) -> Self {
        match self {
            Callback::Function(f) => Callback::Function(Rc::clone(f)),
            Callback::Step(f) => Callback::Step(Rc::clone(f)),
        }
    }
}

impl<A> PartialEq for Callback<A> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Callback::Function(a), Callback::Function(b)) => Rc::ptr_eq(a, b),
            (Callback::Step(a), Callback::Step(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl<A> Eq for Callback<A> {}

impl<A> fmt::Debug for Callback<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Callback::Function(ptr) => write!(f, "Callback::Function({:p})", Rc::as_ptr(ptr)),
            Callback::Step(ptr) => write!(f, "Callback::Step({:p})", Rc::as_ptr(ptr)),
        }
    }
}

/// Registry of callbacks fired together on each tick.
pub struct Dispatcher<A> {
    callbacks: Vec<Callback<A>>,
}

impl<A> Default for Dispatcher<A> {
    fn default() -> Self {
        Self {
            callbacks: Vec::new(),
        }
    }
}

impl<A> fmt::Debug for Dispatcher<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("callbacks", &self.callbacks)
            .finish()
    }
}

impl<A> Dispatcher<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` at the end of the run order. Duplicates are ignored.
    ///
    /// Returns whether the callback was added.
    pub fn add_callback(&mut self, callback: Callback<A>) -> bool {
        if self.contains(&callback) {
            return false;
        }
        self.callbacks.push(callback);
        true
    }

    /// Drop `callback` if registered. Returns whether anything was removed.
    pub fn remove_callback(&mut self, callback: &Callback<A>) -> bool {
        match self.callbacks.iter().position(|c| c == callback) {
            Some(index) => {
                self.callbacks.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, callback: &Callback<A>) -> bool {
        self.callbacks.iter().any(|c| c == callback)
    }

    pub fn num_callbacks(&self) -> usize {
        self.callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }

    pub fn clear(&mut self) {
        self.callbacks.clear();
    }

    /// Fire every callback with `args`, in registration order.
    ///
    /// Runs over a snapshot of the registry. Steps that report `Done` are
    /// removed afterwards.
    pub fn dispatch(&mut self, args: &mut A) {
        let snapshot = self.callbacks.clone();
        let mut finished = Vec::new();
        for callback in snapshot {
            if callback.invoke(args) == StepStatus::Done {
                finished.push(callback);
            }
        }
        for callback in &finished {
            self.remove_callback(callback);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorder(log: &Rc<RefCell<Vec<&'static str>>>, name: &'static str) -> Callback<u32> {
        let log = Rc::clone(log);
        Callback::function(move |_| log.borrow_mut().push(name))
    }

    #[test]
    fn duplicate_registration_is_ignored() {
        let mut dispatcher = Dispatcher::<u32>::new();
        let cb = Callback::function(|_| {});
        assert!(dispatcher.add_callback(cb.clone()));
        assert!(!dispatcher.add_callback(cb.clone()));
        assert_eq!(dispatcher.num_callbacks(), 1);
    }

    #[test]
    fn removing_unknown_callback_is_a_no_op() {
        let mut dispatcher = Dispatcher::<u32>::new();
        dispatcher.add_callback(Callback::function(|_| {}));
        assert!(!dispatcher.remove_callback(&Callback::function(|_| {})));
        assert_eq!(dispatcher.num_callbacks(), 1);
    }

    #[test]
    fn dispatch_runs_in_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut dispatcher = Dispatcher::new();
        let a = recorder(&log, "a");
        let b = recorder(&log, "b");
        let c = recorder(&log, "c");
        dispatcher.add_callback(a.clone());
        dispatcher.add_callback(b.clone());
        dispatcher.add_callback(c);
        dispatcher.dispatch(&mut 0);
        assert_eq!(*log.borrow(), vec!["a", "b", "c"]);

        dispatcher.remove_callback(&b);
        dispatcher.add_callback(b);
        log.borrow_mut().clear();
        dispatcher.dispatch(&mut 0);
        assert_eq!(*log.borrow(), vec!["a", "c", "b"]);
        assert!(dispatcher.contains(&a));
    }

    #[test]
    fn every_callback_sees_the_same_argument() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut dispatcher = Dispatcher::new();
        for _ in 0..3 {
            let seen = Rc::clone(&seen);
            dispatcher.add_callback(Callback::function(move |v: &mut u32| seen.borrow_mut().push(*v)));
        }
        dispatcher.dispatch(&mut 7);
        assert_eq!(*seen.borrow(), vec![7, 7, 7]);
    }

    #[test]
    fn finished_steps_are_removed() {
        let mut dispatcher = Dispatcher::new();
        let mut remaining = 2;
        dispatcher.add_callback(Callback::step(move |_: &mut u32| {
            remaining -= 1;
            if remaining == 0 {
                StepStatus::Done
            } else {
                StepStatus::Continue
            }
        }));
        dispatcher.dispatch(&mut 0);
        assert_eq!(dispatcher.num_callbacks(), 1);
        dispatcher.dispatch(&mut 0);
        assert_eq!(dispatcher.num_callbacks(), 0);
    }

    #[test]
    fn once_runs_a_single_time() {
        let hits = Rc::new(RefCell::new(0));
        let mut dispatcher = Dispatcher::new();
        let counter = Rc::clone(&hits);
        dispatcher.add_callback(Callback::once(move |_: &mut u32| *counter.borrow_mut() += 1));
        dispatcher.dispatch(&mut 0);
        dispatcher.dispatch(&mut 0);
        assert_eq!(*hits.borrow(), 1);
        assert!(dispatcher.is_empty());
    }

    #[test]
    fn function_and_step_handles_never_compare_equal() {
        let f = Callback::<u32>::function(|_| {});
        let s = Callback::<u32>::step(|_| StepStatus::Done);
        assert_ne!(f, s);
        assert_eq!(f, f.clone());
    }
}
