//! Assistant personas: the fixed system context, greeting, and apology a
//! chat session is bound to.

use crate::recipe::Recipe;
use crate::session::SessionError;

const STUDY_BUDDY_INSTRUCTION: &str = "You are a helpful and encouraging study buddy for a student. \
Your goal is to help users understand concepts, not just give them answers. Explain topics clearly, \
ask probing questions to check for understanding, and provide examples. Keep your tone positive and \
friendly. If asked for direct answers to homework, guide them through the process of finding the \
answer themselves.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Persona {
    subject: String,
    system_instruction: String,
    greeting: String,
    apology: String,
}

impl Persona {
    /// Build a persona from an arbitrary system context.
    pub fn custom(
        subject: impl Into<String>,
        system_instruction: impl Into<String>,
        greeting: impl Into<String>,
        apology: impl Into<String>,
    ) -> Result<Self, SessionError> {
        let system_instruction = system_instruction.into();
        if system_instruction.trim().is_empty() {
            return Err(SessionError::InvalidInput(
                "system context must not be empty".into(),
            ));
        }
        Ok(Self {
            subject: subject.into(),
            system_instruction,
            greeting: greeting.into(),
            apology: apology.into(),
        })
    }

    /// Chef Gemini, scoped to a single recipe.
    pub fn chef(recipe: &Recipe) -> Self {
        let system_instruction = format!(
            "You are a helpful and friendly cooking assistant named 'Chef Gemini'. \
             You are an expert on the following recipe.\n\
             Recipe Name: {name}.\n\
             Description: {description}.\n\
             Ingredients: {ingredients}.\n\
             Instructions: {instructions}.\n\
             Your role is to answer questions strictly related to this recipe, such as substitution \
             ideas, technique clarifications, or cooking time adjustments. Be encouraging and clear \
             in your responses. Keep answers concise. If asked about a topic not related to this \
             recipe, politely decline and steer the conversation back to the current dish.",
            name = recipe.recipe_name,
            description = recipe.description,
            ingredients = recipe.ingredient_summary(),
            instructions = recipe.instructions.join(" "),
        );
        Self {
            subject: recipe.recipe_name.clone(),
            system_instruction,
            greeting: format!(
                "Hello! I'm Chef Gemini. How can I help you with the \"{}\" recipe?",
                recipe.recipe_name
            ),
            apology: "Sorry, I had a little trouble in the kitchen. Please try again.".to_string(),
        }
    }

    /// The study-helper tutor.
    pub fn study_buddy() -> Self {
        Self {
            subject: "Study Buddy".to_string(),
            system_instruction: STUDY_BUDDY_INSTRUCTION.to_string(),
            greeting: "Hello! I'm your Study Buddy. What topic would you like to explore today?"
                .to_string(),
            apology: "Sorry, I seem to be having a problem. Please try asking again.".to_string(),
        }
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn system_instruction(&self) -> &str {
        &self.system_instruction
    }

    pub fn greeting(&self) -> &str {
        &self.greeting
    }

    pub fn apology(&self) -> &str {
        &self.apology
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::RecipeIngredient;

    fn pancakes() -> Recipe {
        Recipe {
            recipe_name: "Pancakes".into(),
            description: "Fluffy and golden".into(),
            prep_time: String::new(),
            cook_time: String::new(),
            servings: String::new(),
            ingredients: vec![
                RecipeIngredient {
                    quantity: "1 cup".into(),
                    name: "flour".into(),
                },
                RecipeIngredient {
                    quantity: "2".into(),
                    name: "eggs".into(),
                },
            ],
            instructions: vec!["Mix.".into(), "Cook.".into()],
        }
    }

    #[test]
    fn chef_greeting_names_the_recipe() {
        let persona = Persona::chef(&pancakes());
        assert_eq!(
            persona.greeting(),
            "Hello! I'm Chef Gemini. How can I help you with the \"Pancakes\" recipe?"
        );
        assert_eq!(persona.subject(), "Pancakes");
    }

    #[test]
    fn chef_instruction_embeds_recipe_details() {
        let persona = Persona::chef(&pancakes());
        let instruction = persona.system_instruction();
        assert!(instruction.contains("Recipe Name: Pancakes."));
        assert!(instruction.contains("Ingredients: 1 cup flour, 2 eggs."));
        assert!(instruction.contains("Instructions: Mix. Cook.."));
        assert!(instruction.contains("politely decline"));
    }

    #[test]
    fn study_buddy_persona() {
        let persona = Persona::study_buddy();
        assert!(persona.greeting().contains("Study Buddy"));
        assert!(persona.system_instruction().contains("study buddy"));
        assert!(persona.apology().starts_with("Sorry"));
    }

    #[test]
    fn custom_persona_rejects_blank_context() {
        let result = Persona::custom("x", "   ", "hi", "sorry");
        assert!(matches!(result, Err(SessionError::InvalidInput(_))));
    }

    #[test]
    fn custom_persona_keeps_fields() {
        let persona = Persona::custom("Recipe: Pancakes", "Talk about pancakes.", "Hi!", "Oops.").unwrap();
        assert_eq!(persona.subject(), "Recipe: Pancakes");
        assert_eq!(persona.system_instruction(), "Talk about pancakes.");
        assert_eq!(persona.apology(), "Oops.");
    }
}
