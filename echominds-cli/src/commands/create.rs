use anyhow::Result;
use clap::Args;
use colored::Colorize;
use echominds_core::{
    generate_background, generate_details, generate_personality, to_api_payload, BasicUpdate,
    CharacterIdentity, CommunicationUpdate, CompanionForm, PersonalityUpdate, RelationshipUpdate,
    WizardStep,
};

use crate::config::CliContext;

#[derive(Args)]
pub struct CreateArgs {
    // Step 1: identity
    #[arg(long, help = "Companion name")]
    pub name: Option<String>,

    #[arg(long, help = "Avatar emoji")]
    pub avatar: Option<String>,

    #[arg(long)]
    pub gender: Option<String>,

    #[arg(long, help = "Race code (e.g. human, elf, android)")]
    pub race: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long, help = "Category (e.g. supportive, playful)")]
    pub category: Option<String>,

    // Step 2: personality
    #[arg(long, help = "Comma-separated personality traits")]
    pub traits: Option<String>,

    #[arg(long)]
    pub background: Option<String>,

    #[arg(long, help = "Generate missing traits and background with the backend")]
    pub generate: bool,

    // Step 3: communication
    #[arg(long, help = "Reply language code")]
    pub language: Option<String>,

    #[arg(long = "style", help = "Conversation style (repeat up to three times)")]
    pub styles: Vec<String>,

    // Step 4: relationship
    #[arg(long = "relationship", help = "Relationship type, or 'custom'")]
    pub relationship_type: Option<String>,

    #[arg(long, help = "Relationship type used when --relationship custom")]
    pub custom_type: Option<String>,

    #[arg(long, help = "Relationship role, or 'custom'")]
    pub role: Option<String>,

    #[arg(long, help = "Role used when --role custom")]
    pub custom_role: Option<String>,

    #[arg(long, help = "How the companion labels the relationship")]
    pub label: Option<String>,

    #[arg(long, help = "What the companion calls you")]
    pub user_name: Option<String>,

    #[arg(long, help = "Address preference (casual, respectful, intimate)")]
    pub address: Option<String>,

    #[arg(long)]
    pub age_relation: Option<String>,

    #[arg(long)]
    pub authority: Option<String>,

    #[arg(long)]
    pub tone: Option<String>,

    #[arg(long, help = "Print the payload instead of submitting it")]
    pub dry_run: bool,
}

impl CreateArgs {
    fn fill(self, form: &mut CompanionForm) -> bool {
        form.update_basic(BasicUpdate {
            name: self.name,
            avatar: self.avatar,
            gender: self.gender,
            race: self.race,
            description: self.description,
            category: self.category,
        });

        form.next_step();
        form.update_personality(PersonalityUpdate {
            traits: self.traits,
            background: self.background,
        });

        form.next_step();
        form.update_communication(CommunicationUpdate {
            language: self.language,
            styles: (!self.styles.is_empty()).then_some(self.styles),
        });

        form.next_step();
        form.update_relationship(RelationshipUpdate {
            kind: self.relationship_type,
            role: self.role,
            label: self.label,
            custom_type: self.custom_type.map(Some),
            custom_role: self.custom_role.map(Some),
            user_name: self.user_name,
            preferred_address: self.address,
            age_relation: self.age_relation,
            authority_level: self.authority,
            emotional_tone: self.tone,
        });

        self.dry_run
    }
}

pub async fn handle_create_command(ctx: &CliContext, args: CreateArgs) -> Result<()> {
    let generate = args.generate;
    let mut form = CompanionForm::new();
    let dry_run = args.fill(&mut form);

    if generate {
        fill_generated(ctx, &mut form).await;
    }

    println!("{}", "Create Companion".cyan().bold());
    println!("{}", "═".repeat(40).dimmed());

    let validation = form.step_validation();
    for step in WizardStep::all() {
        let mark = if validation.is_valid(*step) {
            "✓".green().bold()
        } else {
            "✗".red().bold()
        };
        println!("  {} Step {}: {}", mark, step.index() + 1, step.title());
    }
    println!();

    if dry_run {
        println!("{}", serde_json::to_string_pretty(&to_api_payload(form.data()))?);
        return Ok(());
    }

    let character = form.submit(ctx.client.as_ref()).await?;

    println!(
        "{} Created {} {} (id {})",
        "✓".green().bold(),
        character.avatar,
        character.name.cyan(),
        character.id
    );
    println!(
        "  Start chatting with {}",
        format!("echominds chat {}", character.id).cyan().bold()
    );
    Ok(())
}

async fn fill_generated(ctx: &CliContext, form: &mut CompanionForm) {
    let identity = CharacterIdentity::from(form.data());
    let personality = &form.data().personality;
    let needs_traits = personality.traits.trim().is_empty();
    let needs_background = personality.background.trim().is_empty();

    if needs_traits && needs_background {
        println!("  {} Generating personality and background...", "→".blue());
        let details = generate_details(ctx.client.as_ref(), &identity).await;
        form.update_personality(PersonalityUpdate {
            traits: Some(details.personality),
            background: Some(details.background),
        });
    } else if needs_traits {
        println!("  {} Generating personality...", "→".blue());
        let traits = generate_personality(ctx.client.as_ref(), &identity).await;
        form.update_personality(PersonalityUpdate {
            traits: Some(traits),
            ..Default::default()
        });
    } else if needs_background {
        println!("  {} Generating background...", "→".blue());
        let traits = personality.traits.clone();
        let background = generate_background(ctx.client.as_ref(), &identity, &traits).await;
        form.update_personality(PersonalityUpdate {
            background: Some(background),
            ..Default::default()
        });
    }
}
