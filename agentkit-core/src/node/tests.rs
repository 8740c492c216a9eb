#[cfg(test)]
mod tests {
    use agentkit_core::*;

    #[derive(State, Debug, Clone, PartialEq)]
    struct DishState {
        #[update(replace)]
        name: String,
        #[update(append)]
        steps: Vec<String>,
    }

    #[tokio::test]
    async fn test_function_node() {
        let node = FunctionNode::new("rename", |_ctx, _: DishState| async move {
            Ok(NodeOutput::Full(DishState {
                name: "curry".to_string(),
                steps: vec![],
            }))
        });

        let ctx = Context::new("test");
        let result = node
            .process(
                &ctx,
                DishState {
                    name: "bread".to_string(),
                    steps: vec![],
                },
            )
            .await
            .unwrap();

        match result {
            NodeOutput::Full(state) => {
                assert_eq!(
                    state,
                    DishState {
                        name: "curry".to_string(),
                        steps: vec![],
                    }
                );
            }
            NodeOutput::Updates(updates) => {
                panic!("Expected a full state, but got updates: {:?}", updates);
            }
        }

        assert_eq!(node.name(), "rename");
    }

    #[test]
    fn test_derived_updates_append_and_replace() {
        let mut state = DishState {
            name: "bread".to_string(),
            steps: vec!["knead".to_string()],
        };

        state.apply_many(vec![
            DishStateUpdate::Name("sourdough".to_string()),
            DishStateUpdate::Steps(vec!["proof".to_string(), "bake".to_string()]),
        ]);

        assert_eq!(state.name, "sourdough");
        assert_eq!(state.steps, vec!["knead", "proof", "bake"]);
    }
}
