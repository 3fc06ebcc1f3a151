use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::Args;
use inquire::Confirm;

use famplan_data::{Identity, Member};
use famplan_ledger::{datetime, resolve, Directory, Ledger, LedgerError};

use crate::{
    formatting::{render_error, PrintFormatted},
    roster,
};

#[derive(Args, Debug)]
pub struct AddMember {
    /// Display name of the member
    pub name: String,
    /// First day of the term (YYYY-MM-DD)
    pub start_date: String,
    /// Length of the term in months
    #[clap(allow_negative_numbers = true)]
    pub duration: i64,
    /// User id of the member
    #[clap(short, long)]
    pub id: Option<i64>,
    /// Guild roster (JSON) to look up the name in
    #[clap(long, env = "FAMPLAN_ROSTER")]
    pub roster: Option<PathBuf>,
}

impl AddMember {
    /// Find the platform user to enroll
    async fn identity(&self) -> Result<Identity> {
        match (&self.roster, self.id) {
            (Some(path), id) => {
                let roster = roster::load(path)?;
                let candidates = roster
                    .find_by_display_name(&self.name)
                    .await
                    .map_err(|e| render_error(e, &self.name))?;
                resolve(candidates, id).map_err(|e| match e {
                    LedgerError::NotFound => {
                        anyhow!("No user found with the name '{}'.", self.name)
                    }
                    e => render_error(e, &self.name),
                })
            }
            (None, Some(id)) => Ok(Identity::new(id, self.name.clone())),
            (None, None) => Err(anyhow!(
                "Need a user id (--id) or a roster (--roster) to add '{}'.",
                self.name
            )),
        }
    }

    /// Run the command and enroll a member
    pub async fn run(self, ledger: &Ledger) -> Result<()> {
        let start_date =
            datetime::parse_date(&self.start_date).map_err(|e| render_error(e, &self.name))?;
        let identity = self.identity().await?;

        let member = ledger
            .enroll(&identity, start_date, self.duration)
            .await
            .map_err(|e| render_error(e, &identity.display_name))?;

        println!(
            "User '{}' has been added with a subscription ending on {}.",
            member.username, member.end_date
        );
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct RemoveMember {
    /// Display name of the member
    pub name: String,
    /// User id, needed if the name is not unique
    #[clap(short, long)]
    pub id: Option<i64>,
    /// Do not ask for confirmation
    #[clap(short, long)]
    pub yes: bool,
}

impl RemoveMember {
    pub async fn run(self, ledger: &Ledger) -> Result<()> {
        let member = ledger
            .resolve_member(&self.name, self.id)
            .await
            .map_err(|e| render_error(e, &self.name))?;

        println!();
        member.print_formatted();
        println!();
        if !self.yes {
            let confirm = Confirm::new("Remove member from the family plan?").with_default(true);
            if !confirm.prompt()? {
                return Ok(());
            }
        }

        let member = ledger
            .remove(member.user_id)
            .await
            .map_err(|e| render_error(e, &self.name))?;
        println!(
            "User '{}' has been removed from the family plan.",
            member.username
        );
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct ListMembers {
    /// Print the members as JSON
    #[clap(long)]
    pub json: bool,
}

impl ListMembers {
    /// Run the command and list members
    pub async fn run(self, ledger: &Ledger) -> Result<()> {
        let members: Vec<Member> = ledger.list().await?;
        if self.json {
            println!("{}", serde_json::to_string_pretty(&members)?);
            return Ok(());
        }
        if members.is_empty() {
            println!("There are currently no users in the database.");
            return Ok(());
        }
        members.print_formatted();
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct ShowMember {
    /// Your user id
    #[clap(short, long)]
    pub id: i64,
}

impl ShowMember {
    /// Run the command and show a member
    pub async fn run(self, ledger: &Ledger) -> Result<()> {
        let member = match ledger.get_self(self.id).await {
            Ok(member) => member,
            Err(LedgerError::NotFound) => {
                println!("You are not registered in the database.");
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        };
        println!("{} Information", member.username);
        member.print_formatted();
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct RenewMember {
    /// Number of months to renew for
    #[clap(allow_negative_numbers = true)]
    pub duration: i64,
    /// Display name of the member to renew
    #[clap(short, long)]
    pub name: Option<String>,
    /// User id of the member to renew
    #[clap(short, long)]
    pub id: Option<i64>,
}

impl RenewMember {
    pub async fn run(self, ledger: &Ledger) -> Result<()> {
        let member = match (&self.name, self.id) {
            (Some(name), id) => ledger.resolve_member(name, id).await,
            (None, Some(id)) => ledger.get_self(id).await,
            (None, None) => {
                return Err(anyhow!(
                    "Invalid parameters. Use 'renew <duration> --id <id>' or \
                    'renew <duration> --name <name>'."
                ))
            }
        };
        let label = match (&self.name, self.id) {
            (Some(name), _) => name.clone(),
            (None, id) => id.unwrap_or_default().to_string(),
        };
        let member = member.map_err(|e| render_error(e, &label))?;

        let renewed = ledger
            .renew(member.user_id, self.duration)
            .await
            .map_err(|e| render_error(e, &member.username))?;

        println!(
            "Subscription for '{}' has been renewed for {} month(s), costing ${:.2}. \
            New end date: {}.",
            renewed.username, renewed.duration, renewed.cost, renewed.end_date
        );
        println!();
        (member, renewed).print_formatted();
        Ok(())
    }
}
