#![no_main]

use std::cell::RefCell;
use std::rc::Rc;

use libfuzzer_sys::fuzz_target;
use promise_fake::{create_chain_resolver, FakeError, Function, Value};

const MAX_OPS: usize = 512;

fuzz_target!(|data: &[u8]| {
    // Each success handler records its index; none may ever run twice.
    let ran = Rc::new(RefCell::new(Vec::<usize>::new()));
    let mut chain = create_chain_resolver();
    let mut registered = 0usize;

    for &byte in data.iter().take(MAX_OPS) {
        let result = match byte % 8 {
            0 | 1 => {
                let index = registered;
                registered += 1;
                let ran = ran.clone();
                let throws = byte & 0x80 != 0;
                chain
                    .then(
                        Function::new(move |args| {
                            ran.borrow_mut().push(index);
                            if throws {
                                Err(Value::error("fuzz"))
                            } else {
                                Ok(args.first().cloned().unwrap_or_default())
                            }
                        }),
                        (),
                    )
                    .map(|_| ())
            }
            2 => chain.catch(Function::noop()).map(|_| ()),
            3 => chain.finally(Function::noop()).map(|_| ()),
            4 => {
                chain.disable_error_requirement();
                Ok(())
            }
            5 => chain.resolve(&[Value::from(u32::from(byte))]).map(|_| ()),
            6 => chain.reject(Value::from(u32::from(byte))).map(|_| ()),
            _ => chain.then(Value::from(u32::from(byte)), ()).map(|_| ()),
        };

        if let Err(err) = result {
            // Only misuse errors can escape: handlers here never throw from catch/finally
            assert!(err.is_usage_error(), "unexpected error: {err}");
            assert!(!matches!(err, FakeError::SettledTwice { .. }));
        }
    }

    let ran = ran.borrow();
    let mut seen = ran.clone();
    seen.sort_unstable();
    seen.dedup();
    assert_eq!(seen.len(), ran.len(), "a success handler ran twice");
    assert!(ran.windows(2).all(|w| w[0] < w[1]), "handlers ran out of order");
    assert!(chain.cursor() <= registered);
});
